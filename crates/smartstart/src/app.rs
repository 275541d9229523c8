use crate::{
    AppResult, ConsoleCommand, SimulatedHost,
    config::{Config, RecordingSettingTable},
    console_command::HELP,
};

use smartstart_core::{Automation, HostEvent, RecordingRule, SceneDecision};

use std::{path::PathBuf, sync::Arc};

use tokio::{sync::mpsc, task::JoinHandle};
use tracing::{debug, error, info, instrument, warn};

/// Whether the input loop keeps going after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Main application state.
///
/// Owns the console input channel and drives the simulated host and the
/// automation from it. Rules are written back to `config_path` whenever the
/// automation reports them dirty.
pub struct App {
    pub(crate) automation: Arc<Automation>,
    pub(crate) host: Arc<SimulatedHost>,
    pub(crate) config: Config,
    pub(crate) config_path: PathBuf,
    pub(crate) line_rx: mpsc::Receiver<String>,
    /// Transition still running, if any. A newer switch supersedes it.
    pub(crate) transition: Option<JoinHandle<()>>,
}

impl App {
    /// Run until `quit` or end of input.
    #[instrument(skip(self))]
    pub(crate) async fn run(mut self) -> AppResult<()> {
        info!("SmartStart starting");

        let decision = self.automation.reconcile();
        debug!(decision = ?decision, "Startup reconciliation done");

        while let Some(line) = self.line_rx.recv().await {
            let command = match line.parse::<ConsoleCommand>() {
                Ok(command) => command,
                Err(e) => {
                    eprintln!("{}", e);
                    continue;
                }
            };

            match self.execute(command) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Quit) => {
                    info!("Quit requested");
                    break;
                }
                Err(e) => {
                    warn!(error = %e, "Command failed");
                    eprintln!("{}", e);
                }
            }

            if let Err(e) = self.persist_if_dirty() {
                error!(error = ?e, "Failed to save recording rules");
            }
        }

        self.abort_transition();
        self.automation.shutdown().await;
        self.persist_if_dirty()?;

        info!("SmartStart shut down successfully");

        Ok(())
    }

    #[instrument(skip(self))]
    fn execute(&mut self, command: ConsoleCommand) -> AppResult<Flow> {
        match command {
            ConsoleCommand::Cut(scene) => {
                self.host.set_program_scene(&scene)?;
                self.abort_transition();
                report(self.automation.handle_event(HostEvent::SceneChanged));
            }
            ConsoleCommand::Transition(scene) => {
                self.host.check_scene(&scene)?;
                report(self.automation.handle_event(HostEvent::TransitionStarted {
                    destination: scene.clone(),
                }));
                self.finish_transition(scene);
            }
            ConsoleCommand::AddScene(scene) => {
                self.host.add_scene(&scene)?;
                self.automation.handle_event(HostEvent::SceneListChanged);
            }
            ConsoleCommand::RemoveScene(scene) => {
                self.host.remove_scene(&scene)?;
                self.automation.handle_event(HostEvent::SceneListChanged);
            }
            ConsoleCommand::Rename { old_name, new_name } => {
                self.host.rename_scene(&old_name, &new_name)?;
                self.automation
                    .handle_event(HostEvent::SceneRenamed { old_name, new_name });
            }
            ConsoleCommand::Rule {
                scene_name,
                action,
                delay_ms,
            } => {
                self.host.check_scene(&scene_name)?;
                let rule = RecordingRule::new(scene_name, action, delay_ms);
                let shown = rule.to_string();
                self.automation.upsert_rule(rule)?;
                println!("rule set: {}", shown);
            }
            ConsoleCommand::Unrule(scene) => match self.automation.remove_rule(&scene) {
                Some(rule) => println!("rule removed: {}", rule),
                None => println!("no rule for '{}'", scene),
            },
            ConsoleCommand::Pause => self.host.pause()?,
            ConsoleCommand::Resume => self.host.resume()?,
            ConsoleCommand::Rules => self.print_rules(),
            ConsoleCommand::Status => self.print_status(),
            ConsoleCommand::Help => println!("{}", HELP),
            ConsoleCommand::Quit => return Ok(Flow::Quit),
            ConsoleCommand::Empty => {}
        }

        Ok(Flow::Continue)
    }

    /// Report the scene change once the transition has run its course.
    ///
    /// Only the latest transition lands; an earlier one still running is
    /// aborted so its destination never reaches program.
    fn finish_transition(&mut self, scene: String) {
        self.abort_transition();

        let automation = Arc::clone(&self.automation);
        let host = Arc::clone(&self.host);
        let duration = self.config.host.transition();

        self.transition = Some(tokio::spawn(async move {
            tokio::time::sleep(duration).await;

            if let Err(e) = host.set_program_scene(&scene) {
                warn!(scene = %scene, error = %e, "Transition target vanished");
                return;
            }

            let decision = automation.handle_event(HostEvent::SceneChanged);
            debug!(scene = %scene, decision = ?decision, "Transition finished");
        }));
    }

    fn abort_transition(&mut self) {
        if let Some(previous) = self.transition.take() {
            if !previous.is_finished() {
                debug!("Running transition superseded");
            }
            previous.abort();
        }
    }

    fn persist_if_dirty(&mut self) -> AppResult<()> {
        if !self.automation.take_dirty() {
            return Ok(());
        }

        self.config.recording_setting_table =
            RecordingSettingTable::from_rules(&self.automation.rules());
        self.config.save_to(&self.config_path)
    }

    fn print_rules(&self) {
        let rules = self.automation.rules();
        if rules.is_empty() {
            println!("no rules");
        }
        for rule in &rules {
            println!("  {}", rule);
        }

        let free = self.automation.unconfigured_scenes();
        if !free.is_empty() {
            println!("scenes without a rule: {}", free.join(", "));
        }
    }

    fn print_status(&self) {
        let snapshot = self.host.snapshot();
        let controller = self.automation.controller();

        println!(
            "program: {} | recording: {} | start calls: {} | stop calls: {}",
            snapshot.current_scene.as_deref().unwrap_or("-"),
            controller.current_state(),
            snapshot.starts,
            snapshot.stops
        );

        match controller.pending() {
            Some(pending) => println!(
                "pending: {} in {}ms",
                pending.action,
                pending.remaining().as_millis()
            ),
            None => println!("pending: none"),
        }

        println!("scenes: {}", snapshot.scenes.join(", "));
    }
}

fn report(decision: Option<SceneDecision>) {
    if let Some(SceneDecision::Requested { action, delay }) = decision {
        println!("-> {} requested, delay {}ms", action, delay.as_millis());
    }
}
