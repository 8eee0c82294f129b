//! NDJSON frame replay.
//!
//! Each non-blank line is one rosbridge frame.  Lines starting with `#` are
//! comments.  A frame that fails to parse is logged and counted; replay
//! carries on with the next line.
//!
//! The shutdown flag is checked between lines, so a first Ctrl-C on an idle
//! interactive stdin takes effect only when the next line or EOF arrives.
//! [`request_stop`] tells the caller when a second Ctrl-C should exit at once.

use std::io::BufRead;
use std::sync::atomic::{AtomicBool, Ordering};

use raptor_middleware::LocalBridge;
use raptor_types::RaptorError;
use serde::Serialize;
use tracing::{info, warn};

/// Counters for one replay run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReplayStats {
    /// Frames read (comments and blank lines excluded).
    pub frames: usize,
    /// Total callback deliveries.
    pub delivered: usize,
    /// Frames rejected by the bridge.
    pub rejected: usize,
}

/// Raise the shutdown flag.  Returns `true` if it was already raised, i.e.
/// this is a repeated interrupt and the caller should exit immediately.
pub fn request_stop(shutdown: &AtomicBool) -> bool {
    shutdown.swap(true, Ordering::SeqCst)
}

/// Feed every frame from `reader` into `bridge` until EOF or `shutdown`.
///
/// # Errors
///
/// Returns [`RaptorError::Io`] if reading from `reader` fails.
pub fn replay<R: BufRead>(
    bridge: &LocalBridge,
    reader: R,
    shutdown: &AtomicBool,
) -> Result<ReplayStats, RaptorError> {
    let mut stats = ReplayStats::default();

    for (index, line) in reader.lines().enumerate() {
        if shutdown.load(Ordering::SeqCst) {
            info!(line = index + 1, "replay interrupted");
            break;
        }
        let line = line?;
        let frame = line.trim();
        if frame.is_empty() || frame.starts_with('#') {
            continue;
        }

        stats.frames += 1;
        match bridge.ingest_frame(frame) {
            Ok(n) => stats.delivered += n,
            Err(e) => {
                warn!(line = index + 1, error = %e, "frame rejected");
                stats.rejected += 1;
            }
        }
    }

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use raptor_middleware::{BridgeDescriptor, BridgeTransport, RaptorBridgePlugin};
    use std::io::Cursor;
    use std::sync::Arc;
    use std::sync::atomic::AtomicUsize;

    fn mockup_bridge() -> (LocalBridge, Arc<AtomicUsize>) {
        let bridge = LocalBridge::new(BridgeDescriptor::new(None, Some("ROS2")));
        RaptorBridgePlugin::mockup().register(&bridge);
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        bridge
            .subscribe(
                "/mockup",
                raptor_types::MessageKind::RaptorMockupCommand,
                Box::new(move |_| {
                    counter.fetch_add(1, Ordering::SeqCst);
                }),
            )
            .unwrap();
        (bridge, hits)
    }

    const GOOD: &str = r#"{"op":"publish","topic":"/mockup","msg":{"vehicle_number":1,"engine_ignition_command":true,"emergency_stop_command":false}}"#;

    #[test]
    fn replays_frames_skipping_comments_and_blanks() {
        let (bridge, hits) = mockup_bridge();
        let input = format!("# header comment\n{GOOD}\n\n   \n{GOOD}\n");
        let stats = replay(&bridge, Cursor::new(input), &AtomicBool::new(false)).unwrap();
        assert_eq!(
            stats,
            ReplayStats {
                frames: 2,
                delivered: 2,
                rejected: 0
            }
        );
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn bad_frames_are_counted_and_skipped() {
        let (bridge, hits) = mockup_bridge();
        let input = format!("{{broken\n{GOOD}\n");
        let stats = replay(&bridge, Cursor::new(input), &AtomicBool::new(false)).unwrap();
        assert_eq!(stats.frames, 2);
        assert_eq!(stats.rejected, 1);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn shutdown_flag_stops_replay() {
        let (bridge, hits) = mockup_bridge();
        let stats = replay(&bridge, Cursor::new(format!("{GOOD}\n")), &AtomicBool::new(true)).unwrap();
        assert_eq!(stats, ReplayStats::default());
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn second_stop_request_asks_for_immediate_exit() {
        let shutdown = AtomicBool::new(false);
        assert!(!request_stop(&shutdown));
        assert!(shutdown.load(Ordering::SeqCst));
        assert!(request_stop(&shutdown));
    }
}
