//! Remote command inbox.
//!
//! The accessory transport writes characteristics from its own callback
//! context.  [`deliver`] decodes each write into an [`AppCommand`] and
//! queues it on a bounded `embassy-sync` channel; the control loop drains
//! the channel through [`RemoteInbox`] at the start of the command phase
//! of every tick.  No heap allocation on either side.
//!
//! ```text
//! ┌──────────────┐  AppCommand  ┌──────────────┐
//! │  Transport   │────────────▶│ Control Loop │
//! │  callback    │   (depth 8)  │   (tick)     │
//! └──────────────┘              └──────────────┘
//! ```

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use log::warn;

use crate::app::commands::{AppCommand, Characteristic, RemoteValue};
use crate::app::ports::CommandSource;

/// Channel depth for inbound commands.
const INBOX_DEPTH: usize = 8;

pub type CommandChannel = Channel<CriticalSectionRawMutex, AppCommand, INBOX_DEPTH>;

/// Inbound command channel: transport callback → control loop.
pub static COMMAND_CHANNEL: CommandChannel = Channel::new();

/// Decode a characteristic write and queue it for the control loop.
/// Returns `false` if the inbox was full and the command was dropped.
pub fn deliver(characteristic: Characteristic, value: RemoteValue) -> bool {
    deliver_to(&COMMAND_CHANNEL, characteristic, value)
}

pub fn deliver_to(
    channel: &CommandChannel,
    characteristic: Characteristic,
    value: RemoteValue,
) -> bool {
    let cmd = AppCommand::from_remote(characteristic, value);
    if channel.try_send(cmd).is_err() {
        warn!("remote: command inbox full, dropping {:?}", cmd);
        return false;
    }
    true
}

/// Control-loop side of the inbox.
pub struct RemoteInbox<'a> {
    channel: &'a CommandChannel,
}

impl RemoteInbox<'static> {
    /// Inbox over the global [`COMMAND_CHANNEL`].
    pub fn new() -> Self {
        Self {
            channel: &COMMAND_CHANNEL,
        }
    }
}

impl Default for RemoteInbox<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> RemoteInbox<'a> {
    pub fn on(channel: &'a CommandChannel) -> Self {
        Self { channel }
    }
}

impl CommandSource for RemoteInbox<'_> {
    fn next_command(&mut self) -> Option<AppCommand> {
        self.channel.try_receive().ok()
    }
}
