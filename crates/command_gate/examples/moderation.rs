//! Example: a moderation command with gated and ungated subcommands
//!
//! Registers `/mod reload`, `/mod kick` and `/mod ban`, then routes a few
//! invocations for a guest and a moderator.
//!
//! Run with: `cargo run --example moderation`

use command_gate::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;

/// Console-backed user
struct ConsoleUser {
    name: &'static str,
    permissions: HashSet<&'static str>,
}

impl User for ConsoleUser {
    fn has_permission(&self, permission: &str) -> bool {
        self.permissions.contains(permission)
    }

    fn send_message(&self, text: &str) {
        println!("[to {}] {}", self.name, command_gate::color::strip_color(text));
    }
}

struct Reload;

impl SubcommandHandler for Reload {
    fn name(&self) -> &str {
        "reload"
    }

    fn handle_subcommand(&self, user: &dyn User, _args: &[String]) -> Result<(), GateError> {
        user.send_message("&aConfiguration reloaded");
        Ok(())
    }
}

struct Kick;

#[permission]
impl SubcommandHandler for Kick {
    fn name(&self) -> &str {
        "kick"
    }

    fn handle_subcommand(&self, user: &dyn User, args: &[String]) -> Result<(), GateError> {
        let target = args
            .get(1)
            .ok_or_else(|| GateError::Execution("usage: /mod kick <player>".to_string()))?;
        user.send_message(&format!("Kicked {}", target));
        Ok(())
    }
}

struct Ban;

#[permission(node = "mod.ban", message = "&cYou may not ban players")]
impl SubcommandHandler for Ban {
    fn name(&self) -> &str {
        "ban"
    }

    fn handle_subcommand(&self, user: &dyn User, args: &[String]) -> Result<(), GateError> {
        let target = args
            .get(1)
            .ok_or_else(|| GateError::Execution("usage: /mod ban <player>".to_string()))?;
        user.send_message(&format!("Banned {}", target));
        Ok(())
    }
}

fn invoke(registry: &SubcommandRegistry, user: &ConsoleUser, line: &str) {
    let args: Vec<String> = line.split_whitespace().map(String::from).collect();
    println!("{} > /{} {}", user.name, registry.parent().name(), line);

    match registry.dispatch(user, &args) {
        Ok(Dispatch::Performed) => {}
        Ok(Dispatch::Missing) => println!("  subcommands: {:?}", registry.names().collect::<Vec<_>>()),
        Ok(Dispatch::Unknown(name)) => println!("  unknown subcommand '{}'", name),
        Err(e) => println!("  error: {}", e),
    }
}

#[tokio::main]
async fn main() -> Result<(), GateError> {
    let parent = CommandRef::new("mod");
    let mut registry = SubcommandRegistry::new(parent.clone());

    let mut kick = Subcommand::new(parent.clone(), Kick);
    kick.set_permission_gate("mod.kick", "&cYou may not kick players")?;

    registry.register(Subcommand::new(parent.clone(), Reload))?;
    registry.register(kick)?;
    registry.register(Subcommand::new(parent, Ban))?;

    let guest = ConsoleUser {
        name: "guest",
        permissions: HashSet::new(),
    };
    let moderator = ConsoleUser {
        name: "moderator",
        permissions: ["mod.kick", "mod.ban"].into_iter().collect(),
    };

    for line in ["reload", "kick alex", "ban alex", "", "mute alex"] {
        invoke(&registry, &guest, line);
    }
    for line in ["kick alex", "ban", "ban alex"] {
        invoke(&registry, &moderator, line);
    }

    // Update notices for operators
    let checker = UpdateChecker::new(
        UpdateCheckerOptions::builder()
            .plugin_name("Moderation")
            .current_version("1.4.0")
            .download_url("https://example.org/moderation")
            .build(),
    );
    let source: Arc<dyn VersionSource> =
        Arc::new(|| async { Ok::<_, GateError>("1.5.0".to_string()) });
    if let Err(e) = checker.spawn_check(source).await {
        println!("update check task failed: {}", e);
    }
    checker.send_update_check(&moderator);

    Ok(())
}
