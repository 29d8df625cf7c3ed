use std::sync::Arc;

use teloxide::prelude::*;

use crate::dispatch::MessageDispatcher;
use crate::transport::incoming_from_message;

/// Long-polls for updates until Ctrl-C.
pub async fn run(bot: Bot, dispatcher: Arc<MessageDispatcher>) {
    tracing::info!("starting in polling mode");

    let handler = Update::filter_message().endpoint(move |msg: Message| {
        let dispatcher = Arc::clone(&dispatcher);
        async move {
            if let Some(incoming) = incoming_from_message(&msg) {
                let chat_id = incoming.chat_id.0;
                if let Err(e) = dispatcher.handle(incoming).await {
                    tracing::error!(chat_id, error = %e, "failed to handle message");
                }
            } else {
                tracing::debug!(msg_id = msg.id.0, "ignoring non-text message");
            }
            respond(())
        }
    });

    Dispatcher::builder(bot, handler)
        .default_handler(|_| async {})
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}
