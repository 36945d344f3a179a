//! Build events and listener dispatch.
//!
//! Every lifecycle transition (build, target, task) and every engine message
//! is reported as a [`BuildEvent`] to all registered listeners. Delivery is
//! synchronous on the caller's thread: every listener has seen the event
//! before the emitting call returns. Listeners observe only; they cannot
//! alter control flow.

use std::error::Error;

/// What happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
  BuildStarted,
  BuildFinished,
  TargetStarted,
  TargetFinished,
  TaskStarted,
  TaskFinished,
  Message,
}

/// Priority of a [`EventKind::Message`] event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MessagePriority {
  Error,
  Warn,
  Info,
  Verbose,
  Debug,
}

/// A single lifecycle notification.
///
/// Events borrow from the emitting scope; listeners that need to keep data
/// past the callback must copy it out.
#[derive(Debug)]
pub struct BuildEvent<'a> {
  pub kind: EventKind,
  /// Target the event concerns, when any.
  pub target: Option<&'a str>,
  /// Task the event concerns, when any.
  pub task: Option<&'a str>,
  /// Text payload of a `Message` event.
  pub message: Option<&'a str>,
  pub priority: MessagePriority,
  /// The failure attached to a finished event, when one occurred.
  pub cause: Option<&'a dyn Error>,
}

impl<'a> BuildEvent<'a> {
  fn new(kind: EventKind) -> Self {
    Self {
      kind,
      target: None,
      task: None,
      message: None,
      priority: MessagePriority::Info,
      cause: None,
    }
  }
}

/// Observer of build progress.
///
/// Callbacks run on the build thread; a listener that blocks stalls the
/// build.
pub trait BuildListener: Send {
  fn on_event(&mut self, event: &BuildEvent<'_>);
}

/// Fans events out to every registered listener, in registration order.
#[derive(Default)]
pub struct EventDispatcher {
  listeners: Vec<Box<dyn BuildListener>>,
}

impl EventDispatcher {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn add_listener(&mut self, listener: Box<dyn BuildListener>) {
    self.listeners.push(listener);
  }

  pub fn listener_count(&self) -> usize {
    self.listeners.len()
  }

  pub fn build_started(&mut self) {
    self.fire(BuildEvent::new(EventKind::BuildStarted));
  }

  pub fn build_finished(&mut self, cause: Option<&dyn Error>) {
    let mut event = BuildEvent::new(EventKind::BuildFinished);
    event.cause = cause;
    self.fire(event);
  }

  pub fn target_started(&mut self, target: &str) {
    let mut event = BuildEvent::new(EventKind::TargetStarted);
    event.target = Some(target);
    self.fire(event);
  }

  pub fn target_finished(&mut self, target: &str, cause: Option<&dyn Error>) {
    let mut event = BuildEvent::new(EventKind::TargetFinished);
    event.target = Some(target);
    event.cause = cause;
    self.fire(event);
  }

  pub fn task_started(&mut self, target: &str, task: &str) {
    let mut event = BuildEvent::new(EventKind::TaskStarted);
    event.target = Some(target);
    event.task = Some(task);
    self.fire(event);
  }

  pub fn task_finished(&mut self, target: &str, task: &str, cause: Option<&dyn Error>) {
    let mut event = BuildEvent::new(EventKind::TaskFinished);
    event.target = Some(target);
    event.task = Some(task);
    event.cause = cause;
    self.fire(event);
  }

  pub fn message(&mut self, text: &str, priority: MessagePriority) {
    let mut event = BuildEvent::new(EventKind::Message);
    event.message = Some(text);
    event.priority = priority;
    self.fire(event);
  }

  fn fire(&mut self, event: BuildEvent<'_>) {
    for listener in &mut self.listeners {
      listener.on_event(&event);
    }
  }
}

#[cfg(test)]
mod tests {
  use std::sync::{Arc, Mutex};

  use super::*;

  struct Recorder {
    seen: Arc<Mutex<Vec<(EventKind, Option<String>)>>>,
  }

  impl BuildListener for Recorder {
    fn on_event(&mut self, event: &BuildEvent<'_>) {
      self
        .seen
        .lock()
        .unwrap()
        .push((event.kind, event.target.map(str::to_string)));
    }
  }

  fn recorder() -> (Arc<Mutex<Vec<(EventKind, Option<String>)>>>, Box<Recorder>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let listener = Box::new(Recorder { seen: seen.clone() });
    (seen, listener)
  }

  #[test]
  fn events_reach_every_listener_in_order() {
    let (seen_a, listener_a) = recorder();
    let (seen_b, listener_b) = recorder();

    let mut dispatcher = EventDispatcher::new();
    dispatcher.add_listener(listener_a);
    dispatcher.add_listener(listener_b);

    dispatcher.build_started();
    dispatcher.target_started("compile");
    dispatcher.target_finished("compile", None);
    dispatcher.build_finished(None);

    let expected = vec![
      (EventKind::BuildStarted, None),
      (EventKind::TargetStarted, Some("compile".to_string())),
      (EventKind::TargetFinished, Some("compile".to_string())),
      (EventKind::BuildFinished, None),
    ];
    assert_eq!(*seen_a.lock().unwrap(), expected);
    assert_eq!(*seen_b.lock().unwrap(), expected);
  }

  #[test]
  fn delivery_is_synchronous() {
    let (seen, listener) = recorder();
    let mut dispatcher = EventDispatcher::new();
    dispatcher.add_listener(listener);

    dispatcher.task_started("compile", "exec");
    // Already delivered by the time the call returned.
    assert_eq!(seen.lock().unwrap().len(), 1);
  }

  #[test]
  fn message_carries_priority() {
    struct Check;
    impl BuildListener for Check {
      fn on_event(&mut self, event: &BuildEvent<'_>) {
        assert_eq!(event.kind, EventKind::Message);
        assert_eq!(event.message, Some("build sequence: a, b"));
        assert_eq!(event.priority, MessagePriority::Verbose);
      }
    }

    let mut dispatcher = EventDispatcher::new();
    dispatcher.add_listener(Box::new(Check));
    dispatcher.message("build sequence: a, b", MessagePriority::Verbose);
  }

  #[test]
  fn dispatcher_without_listeners_is_silent() {
    let mut dispatcher = EventDispatcher::new();
    assert_eq!(dispatcher.listener_count(), 0);
    dispatcher.build_started();
    dispatcher.build_finished(None);
  }
}
