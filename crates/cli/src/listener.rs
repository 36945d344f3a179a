//! Console build listener.
//!
//! Renders build events as terminal output: target headers as the build
//! moves along, engine messages at the right verbosity, failures in red.

use gantry_lib::event::{BuildEvent, BuildListener, EventKind, MessagePriority};
use owo_colors::{OwoColorize, Stream};

use crate::output;

/// Prints build progress to the terminal as events arrive.
pub struct ConsoleListener {
  verbose: bool,
}

impl ConsoleListener {
  pub fn new(verbose: bool) -> Self {
    Self { verbose }
  }
}

impl BuildListener for ConsoleListener {
  fn on_event(&mut self, event: &BuildEvent<'_>) {
    match event.kind {
      EventKind::TargetStarted => {
        if let Some(target) = event.target {
          println!();
          println!("{}:", target.if_supports_color(Stream::Stdout, |s| s.bold()));
        }
      }
      EventKind::TaskStarted => {
        if self.verbose
          && let Some(task) = event.task
        {
          println!(
            "  {} {}",
            output::symbols::ARROW.if_supports_color(Stream::Stdout, |s| s.dimmed()),
            task.if_supports_color(Stream::Stdout, |s| s.dimmed())
          );
        }
      }
      EventKind::TaskFinished => {
        if let Some(cause) = event.cause {
          output::print_error(&cause.to_string());
        }
      }
      EventKind::Message => {
        let visible = match event.priority {
          MessagePriority::Error | MessagePriority::Warn | MessagePriority::Info => true,
          MessagePriority::Verbose | MessagePriority::Debug => self.verbose,
        };
        if visible
          && let Some(message) = event.message
        {
          match event.priority {
            MessagePriority::Error | MessagePriority::Warn => eprintln!("{message}"),
            _ => println!("{message}"),
          }
        }
      }
      // The run summary is printed by the command, not the listener.
      EventKind::BuildStarted | EventKind::BuildFinished | EventKind::TargetFinished => {}
    }
  }
}
