use serde::Deserialize;

/// Tuning for the realtime delivery path.
#[derive(Debug, Clone, Deserialize)]
pub struct RealtimeConfig {
    /// Outbound event queue depth per connection. A receiver that falls
    /// this far behind starts losing events rather than blocking senders.
    #[serde(default = "default_event_buffer_size")]
    pub event_buffer_size: usize,
    /// Longest accepted message body, in characters.
    #[serde(default = "default_max_message_length")]
    pub max_message_length: usize,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            event_buffer_size: default_event_buffer_size(),
            max_message_length: default_max_message_length(),
        }
    }
}

fn default_event_buffer_size() -> usize {
    256
}

fn default_max_message_length() -> usize {
    4000
}
