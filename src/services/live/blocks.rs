//! 场次内的学生封禁列表

use dashmap::DashMap;

use super::bus::direct_key;
use crate::models::live::entities::UserBlock;

#[derive(Default)]
pub struct LiveUserBlocks {
    blocks: DashMap<String, UserBlock>,
}

impl LiveUserBlocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// 封禁学生，已有记录会被覆盖
    pub fn block(
        &self,
        attempt_id: i64,
        user_id: i64,
        reason: Option<String>,
        blocked_by: i64,
        duration_secs: Option<i64>,
        now: i64,
    ) -> UserBlock {
        let block = UserBlock {
            attempt_id,
            user_id,
            reason,
            blocked_by,
            created_at: now,
            expires_at: duration_secs.map(|d| now + d),
        };
        self.blocks
            .insert(direct_key(attempt_id, user_id), block.clone());
        block
    }

    pub fn unblock(&self, attempt_id: i64, user_id: i64) -> Option<UserBlock> {
        self.blocks
            .remove(&direct_key(attempt_id, user_id))
            .map(|(_, block)| block)
    }

    /// 当前生效的封禁记录，过期记录顺带删除
    pub fn active_block(&self, attempt_id: i64, user_id: i64, now: i64) -> Option<UserBlock> {
        let key = direct_key(attempt_id, user_id);
        let block = self.blocks.get(&key).map(|b| b.clone())?;
        if block.is_expired(now) {
            self.blocks.remove(&key);
            return None;
        }
        Some(block)
    }

    pub fn is_blocked(&self, attempt_id: i64, user_id: i64, now: i64) -> bool {
        self.active_block(attempt_id, user_id, now).is_some()
    }

    pub fn list(&self, attempt_id: i64, now: i64) -> Vec<UserBlock> {
        let mut items: Vec<UserBlock> = self
            .blocks
            .iter()
            .filter(|entry| entry.attempt_id == attempt_id && !entry.is_expired(now))
            .map(|entry| entry.value().clone())
            .collect();
        items.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.user_id.cmp(&b.user_id)));
        items
    }

    pub fn purge_expired(&self, now: i64) -> usize {
        let before = self.blocks.len();
        self.blocks.retain(|_, block| !block.is_expired(now));
        before - self.blocks.len()
    }

    pub fn clear_attempt(&self, attempt_id: i64) {
        self.blocks.retain(|_, block| block.attempt_id != attempt_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_and_unblock() {
        let blocks = LiveUserBlocks::new();
        assert!(!blocks.is_blocked(1, 5, 100));

        blocks.block(1, 5, Some("cheating".into()), 2, None, 100);
        assert!(blocks.is_blocked(1, 5, 10_000));
        assert!(!blocks.is_blocked(2, 5, 100));

        let removed = blocks.unblock(1, 5).unwrap();
        assert_eq!(removed.reason.as_deref(), Some("cheating"));
        assert!(!blocks.is_blocked(1, 5, 100));
        assert!(blocks.unblock(1, 5).is_none());
    }

    #[test]
    fn test_timed_block_expires_lazily() {
        let blocks = LiveUserBlocks::new();
        blocks.block(1, 5, None, 2, Some(60), 100);
        assert!(blocks.is_blocked(1, 5, 159));
        assert!(!blocks.is_blocked(1, 5, 160));
        // 已被惰性删除
        assert!(blocks.unblock(1, 5).is_none());
    }

    #[test]
    fn test_list_and_purge() {
        let blocks = LiveUserBlocks::new();
        blocks.block(1, 5, None, 2, Some(10), 100);
        blocks.block(1, 6, None, 2, None, 101);
        blocks.block(2, 7, None, 2, None, 102);

        assert_eq!(blocks.list(1, 105).len(), 2);
        assert_eq!(blocks.list(1, 200).len(), 1);
        assert_eq!(blocks.purge_expired(200), 1);

        blocks.clear_attempt(1);
        assert!(blocks.list(1, 200).is_empty());
        assert_eq!(blocks.list(2, 200).len(), 1);
    }
}
