//! OS signal to event-loop bridging.
//!
//! Translates asynchronous process signals into events that the single
//! GUI thread drains at its next safe opportunity. The only work done in
//! signal context is signal-hook's self-pipe write; mapping and queueing
//! happen on a forwarding thread, and all window manipulation happens
//! later, on the GUI thread, when the router pumps its queue.

use std::sync::mpsc::{channel, Receiver, Sender};

use tracing::debug;

/// Action requested by a delivered signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalEvent {
    /// Interrupt or termination: shut the application down gracefully.
    Shutdown,

    /// First user signal: application-defined.
    Custom,

    /// Second user signal: restore and focus the window.
    Restore,
}

/// Window operations the signal router drives.
///
/// The event-loop owner implements this for its top-level window and
/// hands it to [`SignalRouter::attach`]; the router never touches window
/// state off the GUI thread.
pub trait MainWindow {
    fn hide(&mut self);
    fn close(&mut self);
    fn quit(&mut self);
    fn is_maximized(&self) -> bool;
    fn show_maximized(&mut self);
    fn show_normal(&mut self);
}

/// Receiving end of the signal-to-event channel.
pub struct SignalBridge {
    events: Receiver<SignalEvent>,
    // Keeps the channel open on hosts where no listener is spawned.
    _sender: Sender<SignalEvent>,
}

impl SignalBridge {
    /// Register interrupt, termination, and both user signals.
    ///
    /// `waker` is invoked on the forwarding thread after each enqueue to
    /// rouse the event loop; it must be cheap and thread-safe. Hosts
    /// without Unix signal delivery get a bridge that never produces
    /// events.
    pub fn install<F>(waker: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        let (sender, events) = channel();
        spawn_listener(sender.clone(), waker);
        Self {
            events,
            _sender: sender,
        }
    }

    /// Drain events enqueued since the last call, in delivery order.
    pub fn try_events(&self) -> impl Iterator<Item = SignalEvent> + '_ {
        self.events.try_iter()
    }

    #[cfg(test)]
    fn detached() -> (Self, Sender<SignalEvent>) {
        let (sender, events) = channel();
        let bridge = Self {
            events,
            _sender: sender.clone(),
        };
        (bridge, sender)
    }
}

#[cfg(unix)]
fn spawn_listener<F>(sender: Sender<SignalEvent>, waker: F)
where
    F: Fn() + Send + Sync + 'static,
{
    use signal_hook::consts::{SIGINT, SIGTERM, SIGUSR1, SIGUSR2};
    use signal_hook::iterator::Signals;

    let mut signals = match Signals::new([SIGINT, SIGTERM, SIGUSR1, SIGUSR2]) {
        Ok(signals) => signals,
        Err(err) => {
            tracing::warn!(%err, "signal handlers not installed");
            return;
        }
    };

    std::thread::spawn(move || {
        for signal in signals.forever() {
            let event = match signal {
                SIGINT | SIGTERM => SignalEvent::Shutdown,
                SIGUSR1 => SignalEvent::Custom,
                SIGUSR2 => SignalEvent::Restore,
                _ => continue,
            };
            if sender.send(event).is_err() {
                break;
            }
            waker();
        }
    });
}

#[cfg(not(unix))]
fn spawn_listener<F>(_sender: Sender<SignalEvent>, _waker: F)
where
    F: Fn() + Send + Sync + 'static,
{
}

/// Routes signal events to the single top-level window.
///
/// Owned by the event-loop owner and driven from the GUI thread only.
pub struct SignalRouter<W: MainWindow> {
    bridge: SignalBridge,
    window: Option<W>,
    on_custom: Option<Box<dyn FnMut()>>,
}

impl<W: MainWindow> SignalRouter<W> {
    pub fn new(bridge: SignalBridge) -> Self {
        Self {
            bridge,
            window: None,
            on_custom: None,
        }
    }

    /// Register the top-level window.
    ///
    /// The first registrant wins; only one window is tracked at a time.
    pub fn attach(&mut self, window: W) {
        if self.window.is_none() {
            self.window = Some(window);
        }
    }

    /// Set the handler for the application-defined user signal.
    pub fn on_custom(&mut self, handler: impl FnMut() + 'static) {
        self.on_custom = Some(Box::new(handler));
    }

    /// Drain pending signal events and apply their actions, in delivery
    /// order. Call from the GUI thread, once per event-loop iteration.
    pub fn pump(&mut self) {
        let pending: Vec<SignalEvent> = self.bridge.try_events().collect();
        for event in pending {
            self.handle(event);
        }
    }

    /// Apply one signal-sourced action now.
    pub fn handle(&mut self, event: SignalEvent) {
        match event {
            SignalEvent::Shutdown => self.shutdown(),
            SignalEvent::Restore => self.restore(),
            SignalEvent::Custom => match self.on_custom.as_mut() {
                Some(handler) => handler(),
                None => debug!("user signal received with no handler attached"),
            },
        }
    }

    // Hide, close, and quit the window, then drop the reference; a second
    // shutdown with the reference already cleared is a no-op.
    fn shutdown(&mut self) {
        if let Some(mut window) = self.window.take() {
            window.hide();
            window.close();
            window.quit();
        }
    }

    // Bring the window back: maximized again if it currently is, normal
    // (non-minimized) otherwise.
    fn restore(&mut self) {
        if let Some(window) = self.window.as_mut() {
            if window.is_maximized() {
                window.show_maximized();
            } else {
                window.show_normal();
            }
        }
    }
}
