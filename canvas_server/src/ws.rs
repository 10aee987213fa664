use futures::{FutureExt, StreamExt};
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tracing::{info, warn};
use uuid::Uuid;
use warp::ws::{Message, WebSocket};

use crate::context::CanvasContextRef;

/// Streams committed paints to one viewer until it goes away. Anything the
/// viewer sends is ignored.
pub async fn viewer_connection_process(ws: WebSocket, context_ref: CanvasContextRef) {
    let (viewer_ws_sender, mut viewer_ws_rcv) = ws.split();
    let (to_viewer, viewer_rcv) = mpsc::unbounded_channel();

    let viewer_rcv_stream = UnboundedReceiverStream::new(viewer_rcv);
    tokio::task::spawn(viewer_rcv_stream.forward(viewer_ws_sender).map(|result| {
        if let Err(e) = result {
            warn!("error sending websocket msg: {e}");
        }
    }));

    let id = Uuid::new_v4().as_simple().to_string();

    {
        // no paint can commit unseen between the welcome generation and registration
        let mut viewers = context_ref.viewers.write().await;
        if let Ok(json) = serde_json::to_string(&context_ref.welcome()) {
            let _ = to_viewer.send(Ok(Message::text(json)));
        }
        viewers.insert(id.clone(), to_viewer);
    }
    info!("viewer {id} connected");

    while let Some(result) = viewer_ws_rcv.next().await {
        match result {
            Ok(msg) if msg.is_close() => break,
            Ok(_) => {}
            Err(e) => {
                warn!("error receiving ws message for viewer {id}: {e}");
                break;
            }
        }
    }

    context_ref.viewers.write().await.remove(&id);
    info!("viewer {id} disconnected");
}
