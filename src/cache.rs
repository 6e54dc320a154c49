//! Answer caching with topic-based invalidation
//!
//! Caches generated answers; entries expire after a TTL and are dropped when
//! their topic is reloaded.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use sha2::{Digest, Sha256};
use std::collections::HashMap;

use crate::types::response::Citation;

/// Cached answer with metadata
#[derive(Debug, Clone)]
pub struct CachedAnswer {
    /// Topic the answer was generated against
    pub topic_key: String,
    /// Original question
    pub question: String,
    /// Generated answer
    pub answer: String,
    /// Citations stored with the answer
    pub citations: Vec<Citation>,
    /// When this was cached
    pub cached_at: DateTime<Utc>,
    /// Number of cache hits
    pub hit_count: u32,
}

/// Answer cache keyed by (topic, normalized question)
pub struct AnswerCache {
    cache: RwLock<HashMap<String, CachedAnswer>>,
    max_entries: usize,
    ttl_seconds: u64,
}

impl AnswerCache {
    /// Create a new answer cache
    pub fn new(max_entries: usize, ttl_seconds: u64) -> Self {
        Self {
            cache: RwLock::new(HashMap::new()),
            max_entries,
            ttl_seconds,
        }
    }

    /// Hash topic + question for the cache key
    fn cache_key(topic_key: &str, question: &str) -> String {
        let normalized = question.to_lowercase().trim().to_string();
        let mut hasher = Sha256::new();
        hasher.update(topic_key.as_bytes());
        hasher.update(b"\n");
        hasher.update(normalized.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Get a cached answer if present and not expired
    pub fn get(&self, topic_key: &str, question: &str) -> Option<CachedAnswer> {
        let key = Self::cache_key(topic_key, question);
        let mut cache = self.cache.write();

        if let Some(entry) = cache.get_mut(&key) {
            let age = Utc::now().signed_duration_since(entry.cached_at);
            if age.num_seconds() < 0 || age.num_seconds() as u64 > self.ttl_seconds {
                tracing::debug!("Cache miss (TTL expired): {}", &key[..12]);
                cache.remove(&key);
                return None;
            }

            entry.hit_count += 1;
            tracing::debug!("Cache hit: {} (hits: {})", &key[..12], entry.hit_count);
            return Some(entry.clone());
        }

        None
    }

    /// Store an answer in the cache
    pub fn put(
        &self,
        topic_key: &str,
        question: &str,
        answer: String,
        citations: Vec<Citation>,
    ) {
        let key = Self::cache_key(topic_key, question);

        let entry = CachedAnswer {
            topic_key: topic_key.to_string(),
            question: question.to_string(),
            answer,
            citations,
            cached_at: Utc::now(),
            hit_count: 0,
        };

        let mut cache = self.cache.write();
        if cache.len() >= self.max_entries {
            if let Some(oldest_key) = cache
                .iter()
                .min_by_key(|(_, v)| v.cached_at)
                .map(|(k, _)| k.clone())
            {
                cache.remove(&oldest_key);
            }
        }
        cache.insert(key, entry);
    }

    /// Drop all cached answers for a topic (called on reload)
    pub fn invalidate_topic(&self, topic_key: &str) -> usize {
        let mut cache = self.cache.write();
        let before = cache.len();
        cache.retain(|_, v| v.topic_key != topic_key);
        let invalidated = before - cache.len();

        if invalidated > 0 {
            tracing::info!(
                "Invalidated {} cached answers for topic '{}'",
                invalidated,
                topic_key
            );
        }

        invalidated
    }

    /// Clear the entire cache
    pub fn clear(&self) {
        self.cache.write().clear();
    }

    /// Cache statistics
    pub fn stats(&self) -> CacheStats {
        let cache = self.cache.read();
        let total_hits: u32 = cache.values().map(|e| e.hit_count).sum();

        CacheStats {
            entries: cache.len(),
            total_hits,
            max_entries: self.max_entries,
            ttl_seconds: self.ttl_seconds,
        }
    }
}

/// Cache statistics
#[derive(Debug, Clone, serde::Serialize)]
pub struct CacheStats {
    pub entries: usize,
    pub total_hits: u32,
    pub max_entries: usize,
    pub ttl_seconds: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_hit() {
        let cache = AnswerCache::new(10, 3600);
        cache.put("fees", "What is the tuition fee?", "50000 per year".to_string(), vec![]);

        let result = cache.get("fees", "What is the tuition fee?");
        assert!(result.is_some());
        assert_eq!(result.unwrap().answer, "50000 per year");
    }

    #[test]
    fn test_cache_key_normalizes_question() {
        let cache = AnswerCache::new(10, 3600);
        cache.put("fees", "What is the tuition fee?", "50000".to_string(), vec![]);

        assert!(cache.get("fees", "  WHAT IS THE TUITION FEE?  ").is_some());
    }

    #[test]
    fn test_cache_keyed_by_topic() {
        let cache = AnswerCache::new(10, 3600);
        cache.put("fees", "What is the deadline?", "July 15".to_string(), vec![]);

        assert!(cache.get("admission_process", "What is the deadline?").is_none());
    }

    #[test]
    fn test_invalidate_topic() {
        let cache = AnswerCache::new(10, 3600);
        cache.put("fees", "q1", "a1".to_string(), vec![]);
        cache.put("fees", "q2", "a2".to_string(), vec![]);
        cache.put("cutoffs", "q3", "a3".to_string(), vec![]);

        assert_eq!(cache.invalidate_topic("fees"), 2);
        assert!(cache.get("fees", "q1").is_none());
        assert!(cache.get("cutoffs", "q3").is_some());
    }

    #[test]
    fn test_eviction_at_capacity() {
        let cache = AnswerCache::new(2, 3600);
        cache.put("fees", "q1", "a1".to_string(), vec![]);
        cache.put("fees", "q2", "a2".to_string(), vec![]);
        cache.put("fees", "q3", "a3".to_string(), vec![]);

        assert_eq!(cache.stats().entries, 2);
    }

    #[test]
    fn test_hit_count_increments() {
        let cache = AnswerCache::new(10, 3600);
        cache.put("fees", "q", "a".to_string(), vec![]);

        cache.get("fees", "q");
        let second = cache.get("fees", "q").unwrap();
        assert_eq!(second.hit_count, 2);
    }
}
