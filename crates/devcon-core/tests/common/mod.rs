//! Shared fixtures for console integration tests.
//!
//! Provides a recording target object, a console wired to an in-memory log,
//! and a small command tree used by several suites.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use devcon_core::{
    Binding, Category, Console, ConsoleSettings, LeafCommand, LogLevel, MemoryLog, Method,
};

/// Reflective target that records every call it receives.
#[derive(Debug, Default)]
pub struct Game {
    calls: Mutex<Vec<String>>,
}

impl Game {
    pub fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn greet_name(&self, name: String) {
        self.record(format!("greet(String {name})"));
    }

    pub fn greet_times(&self, times: i32) {
        self.record(format!("greet(i32 {times})"));
    }

    pub fn set_pair(&self, a: i32, b: i32) {
        self.record(format!("set({a}, {b})"));
    }

    pub fn set_text(&self, text: String) {
        self.record(format!("set({text})"));
    }

    pub fn kick(&self, player: String) -> anyhow::Result<()> {
        anyhow::ensure!(player != "admin", "cannot kick {player}");
        self.record(format!("kick({player})"));
        Ok(())
    }

    pub fn god(&self, enabled: bool) {
        self.record(format!("god({enabled})"));
    }
}

/// Every handler the suites expect on [`Game`].
pub fn game_binding(game: &Arc<Game>) -> Binding<Game> {
    Binding::new(Arc::clone(game))
        .method("greet", Game::greet_name)
        .method("greet", Game::greet_times)
        .method("set", Game::set_pair)
        .method("set", Game::set_text)
        .with(Method::new("kick", Game::kick).doc("Remove a player", &["player name"]))
        .with(Method::new("god", Game::god).hidden())
}

/// Console with default settings and a fresh in-memory log.
pub fn console() -> (Console, Arc<MemoryLog>) {
    console_with(ConsoleSettings::default())
}

/// Console with custom settings and an in-memory log sized by them.
pub fn console_with(settings: ConsoleSettings) -> (Console, Arc<MemoryLog>) {
    Console::with_memory_log(settings).unwrap()
}

/// Leaf that appends `name` to the log at success level when run.
pub fn echo_leaf(name: &str) -> LeafCommand {
    let label = name.to_string();
    LeafCommand::new(name, move |_, log| {
        log.append(&label, LogLevel::Success);
        Ok(())
    })
}

/// `help`, `health`, `hello`, and a `net` category holding `ping`, `pong`.
pub fn register_sample_tree(console: &mut Console) {
    for name in ["help", "health", "hello"] {
        console.register_leaf(echo_leaf(name)).unwrap();
    }
    let net = Category::new("net")
        .with_description("Network tools")
        .with(Box::new(echo_leaf("ping")))
        .and_then(|c| c.with(Box::new(echo_leaf("pong"))))
        .unwrap();
    console.register_category(net).unwrap();
}

/// Messages logged at `level`, in order.
pub fn messages(log: &MemoryLog, level: LogLevel) -> Vec<String> {
    log.entries_at(level).into_iter().map(|e| e.message).collect()
}
