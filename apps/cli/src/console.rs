//! Event bus that prints what a user would see.

use silentzone_events::{event_names, EventBus, LogEventBus};

pub struct ConsoleBus {
    log: LogEventBus,
}

impl ConsoleBus {
    pub fn new() -> Self {
        Self { log: LogEventBus }
    }
}

impl EventBus for ConsoleBus {
    fn emit(&self, topic: &str, payload: serde_json::Value) {
        if let Some(line) = render(topic, &payload) {
            println!("[{}] {}", chrono::Local::now().format("%H:%M:%S"), line);
        }
        self.log.emit(topic, payload);
    }
}

fn text<'a>(payload: &'a serde_json::Value, key: &str) -> &'a str {
    payload[key].as_str().unwrap_or("?")
}

fn render(topic: &str, payload: &serde_json::Value) -> Option<String> {
    let line = match topic {
        event_names::ZONE_ENTERED => format!(
            "entered {} ({})",
            text(payload, "name"),
            text(payload, "subject")
        ),
        event_names::ZONE_EXITED => format!("left {}", text(payload, "name")),
        event_names::REMINDER_MESSAGE => format!("» {}", text(payload, "text")),
        event_names::POSITION_ERROR => format!("! {}", text(payload, "message")),
        event_names::POSITION_RESTORED => "position restored".to_string(),
        event_names::MONITOR_STATUS => format!("  {}", text(payload, "distanceLabel")),
        _ => return None,
    };
    Some(line)
}
