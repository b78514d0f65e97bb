//! Telegram update polling loop.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use clipstitch_core::telegram::{parse_command, Command, TelegramClient, Update};
use clipstitch_core::{CommandRunner, IntakeController, UserId};

use crate::metrics::UPDATES_RECEIVED;

const INITIAL_BACKOFF: Duration = Duration::from_secs(1);
const MAX_BACKOFF: Duration = Duration::from_secs(60);

/// Long-polls the Bot API and dispatches each update as its own task, so
/// one user's slow merge never delays another user's upload or the
/// liveness probe.
///
/// Poll failures back off exponentially and never terminate the loop; the
/// offset only advances past updates that were handed to a task.
pub async fn run_polling<R>(
    client: Arc<TelegramClient>,
    controller: Arc<IntakeController<R, TelegramClient>>,
) where
    R: CommandRunner + 'static,
{
    let mut offset: Option<i64> = None;
    let mut backoff = INITIAL_BACKOFF;

    loop {
        match client.get_updates(offset).await {
            Ok(updates) => {
                backoff = INITIAL_BACKOFF;
                for update in updates {
                    offset = Some(update.update_id + 1);
                    UPDATES_RECEIVED.inc();
                    let controller = Arc::clone(&controller);
                    tokio::spawn(async move {
                        dispatch(controller, update).await;
                    });
                }
            }
            Err(e) => {
                warn!(error = %e, "getUpdates failed, retrying in {:?}", backoff);
                tokio::time::sleep(backoff).await;
                backoff = (backoff * 2).min(MAX_BACKOFF);
            }
        }
    }
}

async fn dispatch<R>(controller: Arc<IntakeController<R, TelegramClient>>, update: Update)
where
    R: CommandRunner + 'static,
{
    let Some(message) = update.message else {
        return;
    };
    let user = UserId(message.chat.id);

    if let Some(file_id) = message.clip_file_id() {
        controller.handle_clip(user, file_id).await;
    } else if let Some(text) = message.text.as_deref() {
        match parse_command(text) {
            Some(Command::Start) => controller.handle_start(user).await,
            Some(Command::Merge) => controller.handle_merge(user).await,
            Some(Command::Reset) => controller.handle_reset(user).await,
            None => {
                debug!(%user, "message is neither a clip nor a known command");
                controller.handle_unknown(user).await;
            }
        }
    }
}
