use super::{ChatLogRepository, FaqRepository, HealthCheck, UserRepository};
use crate::models::chat_log::{ChatLog, ChatLogCount, ChatLogUser, ChatLogWithUser};
use crate::models::faq::Faq;
use crate::models::user::User;
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use faqdesk_core::UserToken;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;
use uuid::Uuid;

/// 进程内存储，语义与 PostgreSQL 实现保持一致
#[derive(Default)]
pub struct MemoryStore {
    faqs: RwLock<Vec<Faq>>,
    chat_logs: RwLock<Vec<ChatLog>>,
    users: RwLock<HashMap<Uuid, User>>,
}

/// 按插入顺序保存的记录转为“最新在前”：先反转再按时间稳定排序
fn newest_first<T: Clone>(items: &[T], created_at: impl Fn(&T) -> DateTime<Utc>) -> Vec<T> {
    let mut sorted: Vec<T> = items.iter().rev().cloned().collect();
    sorted.sort_by(|a, b| created_at(b).cmp(&created_at(a)));
    sorted
}

fn faq_matches(faq: &Faq, keyword: &str) -> bool {
    faq.question.contains(keyword) || faq.answer.contains(keyword)
}

impl MemoryStore {
    #[cfg(test)]
    pub(crate) async fn seed_chat_log(&self, log: ChatLog) {
        self.chat_logs.write().await.push(log);
    }
}

#[async_trait]
impl FaqRepository for MemoryStore {
    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Faq>> {
        let faqs = self.faqs.read().await;
        let offset = usize::try_from(offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(limit).unwrap_or(0);

        Ok(newest_first(faqs.as_slice(), |f| f.created_at)
            .into_iter()
            .skip(offset)
            .take(limit)
            .collect())
    }

    async fn search(&self, keyword: &str, limit: Option<i64>) -> Result<Vec<Faq>> {
        let faqs = self.faqs.read().await;
        let limit = limit
            .map(|l| usize::try_from(l).unwrap_or(0))
            .unwrap_or(usize::MAX);

        Ok(newest_first(faqs.as_slice(), |f| f.created_at)
            .into_iter()
            .filter(|faq| faq_matches(faq, keyword))
            .take(limit)
            .collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Faq>> {
        let faqs = self.faqs.read().await;
        Ok(faqs.iter().find(|faq| faq.id == id).cloned())
    }

    async fn create(&self, question: &str, answer: &str) -> Result<Faq> {
        let now = Utc::now();
        let faq = Faq {
            id: Uuid::new_v4(),
            question: question.to_string(),
            answer: answer.to_string(),
            created_at: now,
            updated_at: now,
        };

        self.faqs.write().await.push(faq.clone());
        Ok(faq)
    }

    async fn update(
        &self,
        id: Uuid,
        question: Option<&str>,
        answer: Option<&str>,
    ) -> Result<Option<Faq>> {
        let mut faqs = self.faqs.write().await;
        let Some(faq) = faqs.iter_mut().find(|faq| faq.id == id) else {
            return Ok(None);
        };

        if let Some(question) = question {
            faq.question = question.to_string();
        }
        if let Some(answer) = answer {
            faq.answer = answer.to_string();
        }
        faq.updated_at = Utc::now();

        Ok(Some(faq.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let mut faqs = self.faqs.write().await;
        let before = faqs.len();
        faqs.retain(|faq| faq.id != id);
        Ok(faqs.len() < before)
    }
}

#[async_trait]
impl ChatLogRepository for MemoryStore {
    async fn create(&self, question: &str, answer: &str, user_id: Option<Uuid>) -> Result<ChatLog> {
        let log = ChatLog {
            id: Uuid::new_v4(),
            question: question.to_string(),
            answer: answer.to_string(),
            user_id,
            created_at: Utc::now(),
        };

        self.chat_logs.write().await.push(log.clone());
        Ok(log)
    }

    async fn list_with_users(&self) -> Result<Vec<ChatLogWithUser>> {
        let logs = self.chat_logs.read().await;
        let users = self.users.read().await;

        Ok(newest_first(logs.as_slice(), |l| l.created_at)
            .into_iter()
            .map(|log| {
                let user = log
                    .user_id
                    .and_then(|id| users.get(&id))
                    .map(|user| ChatLogUser {
                        id: user.id,
                        email: user.email.clone(),
                    });
                ChatLogWithUser { log, user }
            })
            .collect())
    }

    async fn count_by_created_at(&self) -> Result<Vec<ChatLogCount>> {
        let logs = self.chat_logs.read().await;

        let mut counts: BTreeMap<DateTime<Utc>, i64> = BTreeMap::new();
        for log in logs.iter() {
            *counts.entry(log.created_at).or_insert(0) += 1;
        }

        Ok(counts
            .into_iter()
            .rev()
            .map(|(created_at, count)| ChatLogCount::new(created_at, count))
            .collect())
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn sync(&self, users: &[UserToken]) -> Result<usize> {
        let mut stored = self.users.write().await;

        for token in users {
            match stored.get_mut(&token.id) {
                Some(user) => {
                    user.name = token.name.clone();
                    user.email = token.email.clone();
                    user.is_admin = token.is_admin;
                    user.updated_at = Utc::now();
                }
                None => {
                    stored.insert(token.id, User::from(token));
                }
            }
        }

        Ok(users.len())
    }
}

#[async_trait]
impl HealthCheck for MemoryStore {
    async fn ping(&self) -> Result<bool> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn user_token(email: &str) -> UserToken {
        UserToken {
            id: Uuid::new_v4(),
            name: "Someone".to_string(),
            email: email.to_string(),
            token: "some-token-1234".to_string(),
            is_admin: false,
            enabled: true,
        }
    }

    #[tokio::test]
    async fn test_list_is_newest_first_with_offset() {
        let store = MemoryStore::default();
        for i in 1..=5 {
            FaqRepository::create(&store, &format!("Q{i}"), "A").await.unwrap();
        }

        let page = store.list(2, 1).await.unwrap();
        let questions: Vec<_> = page.iter().map(|f| f.question.as_str()).collect();
        assert_eq!(questions, vec!["Q4", "Q3"]);

        assert!(store.list(10, 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_matches_question_or_answer() {
        let store = MemoryStore::default();
        FaqRepository::create(&store, "How do I reset my password?", "Use the link").await.unwrap();
        FaqRepository::create(&store, "Billing", "Invoices are sent monthly").await.unwrap();
        FaqRepository::create(&store, "Shipping", "We ship worldwide").await.unwrap();

        assert_eq!(store.search("password", None).await.unwrap().len(), 1);
        assert_eq!(store.search("monthly", None).await.unwrap().len(), 1);
        assert_eq!(store.search("e", Some(2)).await.unwrap().len(), 2);
        // 区分大小写
        assert!(store.search("PASSWORD", None).await.unwrap().is_empty());
        assert!(store.search("nothing here", None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let store = MemoryStore::default();
        let faq = FaqRepository::create(&store, "Q", "A").await.unwrap();

        let updated = store.update(faq.id, None, Some("B")).await.unwrap().unwrap();
        assert_eq!(updated.question, "Q");
        assert_eq!(updated.answer, "B");
        assert!(store.update(Uuid::new_v4(), Some("x"), None).await.unwrap().is_none());

        assert!(store.delete(faq.id).await.unwrap());
        assert!(!store.delete(faq.id).await.unwrap());
        assert!(store.find_by_id(faq.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_chat_logs_join_users() {
        let store = MemoryStore::default();
        let token = user_token("user@example.com");
        store.sync(std::slice::from_ref(&token)).await.unwrap();

        ChatLogRepository::create(&store, "q1", "a1", Some(token.id)).await.unwrap();
        ChatLogRepository::create(&store, "q2", "a2", None).await.unwrap();

        let logs = store.list_with_users().await.unwrap();
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].log.question, "q2");
        assert!(logs[0].user.is_none());
        assert_eq!(
            logs[1].user,
            Some(ChatLogUser {
                id: token.id,
                email: "user@example.com".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_count_by_created_at_groups_exact_timestamps() {
        let store = MemoryStore::default();
        let t1 = Utc::now();
        let t2 = t1 + Duration::seconds(1);

        for (i, at) in [t1, t1, t2].into_iter().enumerate() {
            store
                .seed_chat_log(ChatLog {
                    id: Uuid::new_v4(),
                    question: format!("q{i}"),
                    answer: "a".to_string(),
                    user_id: None,
                    created_at: at,
                })
                .await;
        }

        let counts = store.count_by_created_at().await.unwrap();
        assert_eq!(counts.len(), 2);
        assert_eq!(counts[0].created_at, t2);
        assert_eq!(counts[0].count.id, 1);
        assert_eq!(counts[1].created_at, t1);
        assert_eq!(counts[1].count.id, 2);
    }

    #[tokio::test]
    async fn test_sync_updates_existing_user() {
        let store = MemoryStore::default();
        let mut token = user_token("old@example.com");
        store.sync(std::slice::from_ref(&token)).await.unwrap();

        token.email = "new@example.com".to_string();
        store.sync(std::slice::from_ref(&token)).await.unwrap();

        let users = store.users.read().await;
        assert_eq!(users.len(), 1);
        assert_eq!(users[&token.id].email, "new@example.com");
    }
}
