//! One complete command run: encode, exchange, close
//!
//! The channel is handed over already open and owned by a [`Session`] for the
//! whole run, so it is closed on every exit path, including an unknown
//! command name before anything is written.

use beamer_transport::protocol::canon::status;
use beamer_transport::{
    decode_reply, CanonStatusFrame, CommandSet, Packet, ParseError, PowerState, ReplyKind,
    Response, Session, Transport,
};
use tracing::{debug, info};

use crate::error::Result;

/// Everything a caller needs to report on a finished exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// Normalized command name
    pub command: String,
    pub packet: Packet,
    pub response: Response,
    pub reply_kind: ReplyKind,
}

/// Decoded reply for commands that have a reply format
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub power: PowerState,
    /// Device-specific detail, e.g. the Canon power phase
    pub detail: Option<String>,
}

impl Outcome {
    /// Decode the reply; `None` for commands whose replies are opaque
    pub fn decode(&self) -> Option<std::result::Result<Decoded, ParseError>> {
        let bytes = self.response.as_bytes();
        match self.reply_kind {
            ReplyKind::Raw => None,
            ReplyKind::CanonStatus => Some(CanonStatusFrame::parse(bytes).map(|frame| Decoded {
                power: frame.power_state(),
                detail: Some(status::power_name(frame.power_code()).to_string()),
            })),
            kind => Some(decode_reply(kind, bytes).map(|power| Decoded {
                power,
                detail: None,
            })),
        }
    }
}

/// Send one command from `set` over `channel` and collect the reply
pub fn run_command<T: Transport>(channel: T, set: &CommandSet, name: &str) -> Result<Outcome> {
    let mut session = Session::new(channel);

    let spec = set.resolve(name)?;
    let packet = spec.packet();
    info!("Sending {} ({})", spec.name(), packet);

    let bytes = session.send(&packet)?.collect::<std::result::Result<Vec<u8>, _>>()?;
    session.close()?;
    debug!("Received {} bytes", bytes.len());

    Ok(Outcome {
        command: spec.name().to_string(),
        packet,
        response: Response::new(bytes),
        reply_kind: spec.reply_kind(),
    })
}
