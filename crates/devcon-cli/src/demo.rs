//! Demo command set registered by the shell.
//!
//! A [`DemoShell`] target exposes a handful of bound methods (including
//! overloads and one hidden handler), and a `net` category shows dotted
//! namespaces.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::{Context, anyhow};
use devcon_core::{
    Binding, Category, Console, ConsoleLog, LeafCommand, LogLevel, Method, Parameter,
    RegistryError,
};

/// Target object behind the demo's bound commands.
pub struct DemoShell {
    log: Arc<dyn ConsoleLog>,
    vars: Mutex<BTreeMap<String, String>>,
    counter: AtomicI64,
}

impl std::fmt::Debug for DemoShell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DemoShell")
            .field("counter", &self.counter)
            .finish_non_exhaustive()
    }
}

// Bound handlers receive owned arguments.
#[allow(clippy::needless_pass_by_value)]
impl DemoShell {
    pub fn new(log: Arc<dyn ConsoleLog>) -> Self {
        Self {
            log,
            vars: Mutex::new(BTreeMap::new()),
            counter: AtomicI64::new(0),
        }
    }

    fn say(&self, message: &str) {
        self.log.append(message, LogLevel::Success);
    }

    fn vars(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, String>> {
        self.vars.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn echo(&self, text: String) {
        self.say(&text);
    }

    pub fn add_ints(&self, a: i64, b: i64) {
        self.say(&(a + b).to_string());
    }

    pub fn add_floats(&self, a: f64, b: f64) {
        self.say(&(a + b).to_string());
    }

    pub fn greet_name(&self, name: String) {
        self.say(&format!("Hello, {name}!"));
    }

    pub fn greet_times(&self, times: i32) {
        let times = usize::try_from(times).unwrap_or_default();
        self.say("Hello! ".repeat(times).trim_end());
    }

    pub fn set(&self, key: String, value: String) {
        self.vars().insert(key, value);
    }

    pub fn get(&self, key: String) -> anyhow::Result<()> {
        let value = self
            .vars()
            .get(&key)
            .cloned()
            .ok_or_else(|| anyhow!("no variable named '{key}'"))?;
        self.say(&value);
        Ok(())
    }

    pub fn count(&self) {
        let value = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        self.say(&value.to_string());
    }

    pub fn fail(&self) -> anyhow::Result<()> {
        "300"
            .parse::<u8>()
            .context("demo failure while parsing a byte")?;
        Ok(())
    }

    pub fn secret(&self) {
        self.say("You found the hidden command.");
    }

    /// Every bound method of the demo target.
    pub fn binding(self: &Arc<Self>) -> Binding<Self> {
        Binding::new(Arc::clone(self))
            .with(Method::new("echo", Self::echo).doc("Print a word", &["word to print"]))
            .with(
                Method::new("add", Self::add_ints)
                    .doc("Add two numbers", &["first operand", "second operand"]),
            )
            .method("add", Self::add_floats)
            .with(Method::new("greet", Self::greet_name).doc("Say hello", &["who to greet"]))
            .method("greet", Self::greet_times)
            .with(Method::new("set", Self::set).doc("Store a variable", &["name", "value"]))
            .with(Method::new("get", Self::get).doc("Print a variable", &["name"]))
            .with(Method::new("count", Self::count).doc("Increment and print a counter", &[]))
            .with(Method::new("fail", Self::fail).doc("Always fails", &[]))
            .with(Method::new("secret", Self::secret).hidden())
    }
}

/// `say` prints all of its words.
fn say_command() -> LeafCommand {
    LeafCommand::new("say", |invocation, log| {
        log.append(&invocation.params_joined(), LogLevel::Default);
        Ok(())
    })
    .with_description("Print a sentence")
    .with_parameter(Parameter::new("text").with_description("words to print"))
}

fn net_category() -> Result<Category, RegistryError> {
    Category::new("net")
        .with_description("Network diagnostics")
        .with(Box::new(
            LeafCommand::new("ping", |_, log| {
                log.append("pong", LogLevel::Success);
                Ok(())
            })
            .with_description("Reply with pong"),
        ))?
        .with(Box::new(
            LeafCommand::new("pong", |_, log| {
                log.append("ping", LogLevel::Success);
                Ok(())
            })
            .with_description("Reply with ping"),
        ))
}

/// Register the whole demo set on `console`.
pub fn register_demo(
    console: &mut Console,
    shell: &Arc<DemoShell>,
) -> Result<(), RegistryError> {
    console.register_reflective(shell.binding())?;
    console.register_leaf(say_command())?;
    console.register_category(net_category()?)?;
    Ok(())
}
