//! 进程内实时消息总线
//!
//! 频道键：
//! - `attempt:{attempt_id}:all` 场次广播
//! - `attempt:{attempt_id}:user:{user_id}` 定向消息

use dashmap::DashMap;
use std::sync::Mutex;
use tracing::debug;

use crate::config::LiveConfig;
use crate::models::live::entities::{LiveMessage, MessageLevel};

pub const MAX_CONTENT_CHARS: usize = 500;

pub fn broadcast_key(attempt_id: i64) -> String {
    format!("attempt:{attempt_id}:all")
}

pub fn direct_key(attempt_id: i64, user_id: i64) -> String {
    format!("attempt:{attempt_id}:user:{user_id}")
}

fn attempt_prefix(attempt_id: i64) -> String {
    format!("attempt:{attempt_id}:")
}

/// 校验消息内容，返回去除首尾空白后的文本
pub fn validate_content(content: &str) -> Result<String, String> {
    let trimmed = content.trim();
    let len = trimmed.chars().count();
    if len == 0 {
        return Err("Message content cannot be empty".to_string());
    }
    if len > MAX_CONTENT_CHARS {
        return Err(format!(
            "Message content cannot exceed {MAX_CONTENT_CHARS} characters"
        ));
    }
    Ok(trimmed.to_string())
}

/// 读取窗口：`since` 按秒过滤，`after` 按序号过滤，两者同时给出时都生效
#[derive(Debug, Clone, Copy, Default)]
pub struct MessageWindow {
    pub since: Option<i64>,
    pub after: Option<u64>,
}

impl MessageWindow {
    pub fn new(since: Option<i64>, after: Option<u64>) -> Self {
        Self { since, after }
    }

    fn admits(&self, message: &LiveMessage, cursor: u64) -> bool {
        message.seq <= cursor
            && self.since.is_none_or(|s| message.created_at > s)
            && self.after.is_none_or(|a| message.seq > a)
    }
}

pub struct LiveMessageBus {
    channels: DashMap<String, Vec<LiveMessage>>,
    // 最近一条已写入频道的消息序号；发布期间持有锁
    last_seq: Mutex<u64>,
    ttl_secs: i64,
    max_per_channel: usize,
}

impl LiveMessageBus {
    pub fn new(ttl_secs: i64, max_per_channel: usize) -> Self {
        Self {
            channels: DashMap::new(),
            last_seq: Mutex::new(0),
            ttl_secs: ttl_secs.max(1),
            max_per_channel: max_per_channel.max(1),
        }
    }

    pub fn from_config(config: &LiveConfig) -> Self {
        Self::new(config.message_ttl_secs, config.max_messages_per_channel)
    }

    /// 发布消息，recipient 为空时广播到整个场次
    pub fn publish(
        &self,
        attempt_id: i64,
        sender_id: i64,
        recipient_id: Option<i64>,
        level: MessageLevel,
        content: &str,
        now: i64,
    ) -> Result<LiveMessage, String> {
        let content = validate_content(content)?;

        // 分配序号与写入频道在同一把锁内，读取方拿到的 cursor 之前的消息都已可见
        let mut last_seq = self.last_seq.lock().unwrap_or_else(|e| e.into_inner());
        *last_seq += 1;
        let message = LiveMessage {
            id: uuid::Uuid::new_v4().to_string(),
            seq: *last_seq,
            attempt_id,
            sender_id,
            recipient_id,
            level,
            content,
            created_at: now,
            expires_at: now + self.ttl_secs,
        };

        let key = match recipient_id {
            Some(user_id) => direct_key(attempt_id, user_id),
            None => broadcast_key(attempt_id),
        };

        let mut channel = self.channels.entry(key).or_default();
        channel.push(message.clone());
        // 超出上限时丢弃最旧的消息
        if channel.len() > self.max_per_channel {
            let overflow = channel.len() - self.max_per_channel;
            channel.drain(..overflow);
        }

        Ok(message)
    }

    /// 当前已完整写入的最大序号
    pub fn cursor(&self) -> u64 {
        *self.last_seq.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn collect(
        &self,
        key: &str,
        window: MessageWindow,
        cursor: u64,
        now: i64,
        out: &mut Vec<LiveMessage>,
    ) {
        if let Some(channel) = self.channels.get(key) {
            out.extend(
                channel
                    .iter()
                    .filter(|m| !m.is_expired(now) && window.admits(m, cursor))
                    .cloned(),
            );
        }
    }

    /// 学生可见的消息：广播 + 发给自己的定向消息，同时返回下次轮询用的 cursor
    pub fn messages_for_user(
        &self,
        attempt_id: i64,
        user_id: i64,
        window: MessageWindow,
        now: i64,
    ) -> (Vec<LiveMessage>, u64) {
        let cursor = self.cursor();
        let mut messages = Vec::new();
        self.collect(&broadcast_key(attempt_id), window, cursor, now, &mut messages);
        self.collect(&direct_key(attempt_id, user_id), window, cursor, now, &mut messages);
        messages.sort_by_key(|m| m.seq);
        (messages, cursor)
    }

    /// 监考视角：场次下全部未过期消息
    pub fn messages_for_attempt(
        &self,
        attempt_id: i64,
        window: MessageWindow,
        now: i64,
    ) -> (Vec<LiveMessage>, u64) {
        let cursor = self.cursor();
        let prefix = attempt_prefix(attempt_id);
        let mut messages: Vec<LiveMessage> = self
            .channels
            .iter()
            .filter(|entry| entry.key().starts_with(&prefix))
            .flat_map(|entry| {
                entry
                    .value()
                    .iter()
                    .filter(|m| !m.is_expired(now) && window.admits(m, cursor))
                    .cloned()
                    .collect::<Vec<_>>()
            })
            .collect();
        messages.sort_by_key(|m| m.seq);
        (messages, cursor)
    }

    /// 清理过期消息和空频道，返回删除的消息数
    pub fn purge_expired(&self, now: i64) -> usize {
        let mut removed = 0;
        self.channels.retain(|_, messages| {
            let before = messages.len();
            messages.retain(|m| !m.is_expired(now));
            removed += before - messages.len();
            !messages.is_empty()
        });
        if removed > 0 {
            debug!("Purged {removed} expired live messages");
        }
        removed
    }

    /// 删除场次下的全部频道
    pub fn clear_attempt(&self, attempt_id: i64) {
        let prefix = attempt_prefix(attempt_id);
        self.channels.retain(|key, _| !key.starts_with(&prefix));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_keys() {
        assert_eq!(broadcast_key(7), "attempt:7:all");
        assert_eq!(direct_key(7, 42), "attempt:7:user:42");
    }

    #[test]
    fn test_validate_content() {
        assert!(validate_content("   ").is_err());
        assert_eq!(validate_content("  hi ").unwrap(), "hi");
        assert!(validate_content(&"a".repeat(500)).is_ok());
        assert!(validate_content(&"a".repeat(501)).is_err());
        // 按字符而不是字节计数
        assert!(validate_content(&"考".repeat(500)).is_ok());
    }

    #[test]
    fn test_user_sees_broadcast_and_own_direct_messages() {
        let bus = LiveMessageBus::new(60, 10);
        bus.publish(1, 9, None, MessageLevel::Info, "all", 100).unwrap();
        bus.publish(1, 9, Some(5), MessageLevel::Warning, "to five", 101)
            .unwrap();
        bus.publish(1, 9, Some(6), MessageLevel::Alert, "to six", 102)
            .unwrap();
        bus.publish(2, 9, None, MessageLevel::Info, "other attempt", 103)
            .unwrap();

        let five = bus.messages_for_user(1, 5, MessageWindow::default(), 110).0;
        let contents: Vec<&str> = five.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["all", "to five"]);

        assert_eq!(bus.messages_for_attempt(1, MessageWindow::default(), 110).0.len(), 3);
    }

    #[test]
    fn test_since_filter_and_expiry() {
        let bus = LiveMessageBus::new(30, 10);
        bus.publish(1, 9, None, MessageLevel::Info, "old", 100).unwrap();
        bus.publish(1, 9, None, MessageLevel::Info, "new", 120).unwrap();

        let newer = bus.messages_for_user(1, 5, MessageWindow::new(Some(100), None), 125).0;
        assert_eq!(newer.len(), 1);
        assert_eq!(newer[0].content, "new");

        // old 在 130 过期
        let later = bus.messages_for_user(1, 5, MessageWindow::default(), 130).0;
        assert_eq!(later.len(), 1);

        assert_eq!(bus.purge_expired(130), 1);
        assert_eq!(bus.purge_expired(200), 1);
        assert!(bus.messages_for_attempt(1, MessageWindow::default(), 90).0.is_empty());
    }

    #[test]
    fn test_channel_cap_drops_oldest() {
        let bus = LiveMessageBus::new(60, 2);
        for i in 0..4 {
            bus.publish(1, 9, None, MessageLevel::Info, &format!("m{i}"), 100 + i)
                .unwrap();
        }
        let messages = bus.messages_for_user(1, 5, MessageWindow::default(), 110).0;
        let contents: Vec<&str> = messages.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["m2", "m3"]);
    }

    #[test]
    fn test_clear_attempt() {
        let bus = LiveMessageBus::new(60, 10);
        bus.publish(1, 9, Some(5), MessageLevel::Info, "x", 100).unwrap();
        bus.publish(11, 9, None, MessageLevel::Info, "y", 100).unwrap();
        bus.clear_attempt(1);
        assert!(bus.messages_for_attempt(1, MessageWindow::default(), 100).0.is_empty());
        assert_eq!(bus.messages_for_attempt(11, MessageWindow::default(), 100).0.len(), 1);
    }

    #[test]
    fn test_cursor_delivers_messages_published_in_the_same_second() {
        let bus = LiveMessageBus::new(60, 10);
        let (first, cursor) = bus.messages_for_user(1, 5, MessageWindow::default(), 100);
        assert!(first.is_empty());
        assert_eq!(cursor, 0);

        bus.publish(1, 9, Some(5), MessageLevel::Alert, "eyes on screen", 100)
            .unwrap();

        // 秒级 since 会漏掉同一秒的消息，序号 cursor 不会
        let (by_time, _) = bus.messages_for_user(1, 5, MessageWindow::new(Some(100), None), 100);
        assert!(by_time.is_empty());
        let (next, next_cursor) =
            bus.messages_for_user(1, 5, MessageWindow::new(None, Some(cursor)), 100);
        assert_eq!(next.len(), 1);
        assert_eq!(next[0].content, "eyes on screen");
        assert_eq!(next_cursor, next[0].seq);

        let (drained, _) =
            bus.messages_for_user(1, 5, MessageWindow::new(None, Some(next_cursor)), 101);
        assert!(drained.is_empty());
    }

    #[test]
    fn test_sequence_is_strictly_increasing_across_channels() {
        let bus = LiveMessageBus::new(60, 10);
        let a = bus.publish(1, 9, None, MessageLevel::Info, "a", 100).unwrap();
        let b = bus.publish(2, 9, Some(3), MessageLevel::Info, "b", 100).unwrap();
        let c = bus.publish(1, 9, Some(5), MessageLevel::Info, "c", 100).unwrap();
        assert!(a.seq < b.seq && b.seq < c.seq);
        assert_eq!(bus.cursor(), c.seq);

        let (items, _) = bus.messages_for_attempt(1, MessageWindow::new(None, Some(a.seq)), 100);
        let contents: Vec<&str> = items.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["c"]);
    }
}
