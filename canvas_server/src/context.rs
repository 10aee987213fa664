use std::{collections::HashMap, sync::Arc};

use canvas::{PaintOrchestrator, PaintedCell};
use tokio::sync::{mpsc, RwLock};
use tracing::warn;
use warp::filters::ws::Message;

pub type ViewerSender = mpsc::UnboundedSender<std::result::Result<Message, warp::Error>>;

/// Pushed to websocket viewers.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ViewerMsg {
    Welcome {
        size: usize,
        cooldown_seconds: u64,
        generation: u64,
    },
    Painted(PaintedCell),
}

pub struct CanvasContext {
    pub orchestrator: PaintOrchestrator,
    pub viewers: RwLock<HashMap<String, ViewerSender>>,
    pub cookie_max_age: u64,
}

pub type CanvasContextRef = Arc<CanvasContext>;

impl CanvasContext {
    pub fn new(orchestrator: PaintOrchestrator, cookie_max_age: u64) -> CanvasContext {
        CanvasContext {
            orchestrator,
            viewers: RwLock::new(HashMap::new()),
            cookie_max_age,
        }
    }

    pub fn welcome(&self) -> ViewerMsg {
        let config = self.orchestrator.config();
        ViewerMsg::Welcome {
            size: config.size,
            cooldown_seconds: config.cooldown_seconds,
            generation: self.orchestrator.grid().generation(),
        }
    }

    pub async fn broadcast(&self, msg: &ViewerMsg) {
        let json = match serde_json::to_string(msg) {
            Ok(json) => json,
            Err(e) => {
                warn!("could not encode viewer message: {e}");
                return;
            }
        };

        let mut gone = Vec::new();
        {
            let viewers = self.viewers.read().await;
            for (id, sender) in viewers.iter() {
                if sender.send(Ok(Message::text(json.clone()))).is_err() {
                    gone.push(id.clone());
                }
            }
        }
        if !gone.is_empty() {
            let mut viewers = self.viewers.write().await;
            for id in gone {
                viewers.remove(&id);
            }
        }
    }

    pub async fn viewer_count(&self) -> usize {
        self.viewers.read().await.len()
    }
}
