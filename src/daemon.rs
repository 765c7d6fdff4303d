//! Daemon event loop.

use std::io::Write;

use anyhow::Result;
use tracing::debug;
use tracing::error;
use tracing::info;

use crate::clock::Clock;
use crate::monitor::InactivityMonitor;
use crate::navigation::StackNavigator;
use crate::source::LifecycleSource;
use crate::store::TimestampStore;

/// Feed events from `source` into the monitor until the source ends or Ctrl-C.
///
/// When `events_out` is set, one line describing the navigation state is
/// written to it after each event.
pub async fn run<L, S, C>(
    mut source: L,
    monitor: &mut InactivityMonitor<StackNavigator, S, C>,
    mut events_out: Option<&mut dyn Write>,
) -> Result<()>
where
    L: LifecycleSource,
    S: TimestampStore,
    C: Clock,
{
    info!("Waiting for lifecycle events...");

    loop {
        tokio::select! {
            event = source.next_event() => {
                match event {
                    Ok(Some(event)) => {
                        monitor.handle_event(event);
                        if let Some(out) = events_out.as_deref_mut() {
                            let nav = monitor.navigator();
                            writeln!(
                                out,
                                "[{}] | screen={} depth={}",
                                monitor.state(),
                                nav.current().map_or("/", |s| s.route()),
                                nav.depth()
                            )?;
                        }
                    }
                    Ok(None) => {
                        debug!("Lifecycle source ended");
                        break;
                    }
                    Err(e) => {
                        error!("Lifecycle source error: {}", e);
                        return Err(e.into());
                    }
                }
            }

            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted, shutting down");
                break;
            }
        }
    }

    info!(
        "Stopped in state {} ({} screens presented)",
        monitor.state(),
        monitor.navigator().history().len()
    );
    Ok(())
}
