use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use log::{debug, info, warn};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};
use std::time::Instant;

use crate::tui::command::Command;
use crate::tui::context::Context;
use crate::tui::keys::{Action, KeyAction, KeyActionRegistry, KeyActions, KeyBinding, ScreenAction};
use crate::tui::loader::{AsyncLoadCoordinator, Completion};
use crate::tui::resource::Resource;
use crate::tui::screen::{LoadTask, Screen, ScreenId};
use crate::tui::widgets::{Footer, Header, DEFAULT_FOOTER};
use crate::tui::Theme;

/// Bindings available on every screen.
pub fn global_keys() -> KeyActions {
    let mut actions = KeyActions::new()
        .with(KeyBinding::ctrl('o'), "list organizations", Action::ListOrganizations)
        .with(KeyBinding::ctrl('c'), "quit", Action::Quit)
        .with(KeyCode::Char('?'), "help", Action::Help);
    // Alias, not listed in help
    actions.insert(KeyBinding::ctrl('q'), KeyAction::new("quit", Action::Quit).hidden());
    actions
}

/// A screen registered with the rendering surface.
struct Registered {
    screen: Screen,
    /// Status of the last load: the render message on success, the error text on failure
    state: Resource<String, String>,
}

/// Single authority for what is on screen.
///
/// Owns the navigation context, every registered screen, the key registry and
/// the header/footer, and drives the activate -> load -> render cycle.
pub struct PageController {
    /// Navigation, config and API client, lent to screens
    ctx: Context,

    /// Registered screens, at most one per id
    screens: Vec<Registered>,

    /// Screen currently shown
    active: Option<ScreenId>,

    /// Last non-help screen, where help returns to
    current_page: Option<ScreenId>,

    /// Screen receiving raw input; set once its first render has happened
    focused: Option<ScreenId>,

    /// Live key -> action table
    keys: KeyActionRegistry,

    header: Header,
    footer: Footer,
    loader: AsyncLoadCoordinator,
    theme: Theme,

    /// Cleared when the user quits
    running: bool,
}

impl PageController {
    pub fn new(ctx: Context) -> Self {
        Self {
            ctx,
            screens: Vec::new(),
            active: None,
            current_page: None,
            focused: None,
            keys: KeyActionRegistry::new(),
            header: Header::new(),
            footer: Footer::default(),
            loader: AsyncLoadCoordinator::new(),
            theme: Theme::default(),
            running: true,
        }
    }

    /// Open the first screen: the requested one if it names a screen, else the
    /// one implied by the saved selection.
    pub fn start(&mut self, requested: Option<&str>) {
        let fallback = self.ctx.startup_screen();
        match requested.map(str::parse::<ScreenId>) {
            Some(Ok(id)) => self.navigate(id),
            Some(Err(e)) => {
                warn!("Ignoring start screen: {:#}", e);
                self.navigate(fallback);
                self.footer.show_error(format!("😵 {:#}", e));
            }
            None => self.navigate(fallback),
        }
    }

    /// Activate `id` and report a failure on the footer instead of propagating it.
    pub fn navigate(&mut self, id: ScreenId) {
        if let Err(e) = self.activate(id, None, false) {
            warn!("Could not activate {}: {:#}", id, e);
            self.footer.show_error(format!("😵 {:#}", e));
        }
    }

    /// Make `id` the active screen.
    ///
    /// Any registered screen with the same id is unregistered first. Without an
    /// `existing` instance a fresh one is built. Unless the target is help, the
    /// registry is cleared before the global and screen bindings are merged in.
    /// With `skip_load` the screen is rendered from the data it already holds.
    pub fn activate(&mut self, id: ScreenId, existing: Option<Screen>, skip_load: bool) -> Result<()> {
        info!("Activating {} (skip_load={})", id, skip_load);

        let screen = match existing {
            Some(screen) => screen,
            None => Screen::build(id, &self.ctx, self.current_page)?,
        };

        if !skip_load {
            // Anything still in flight belongs to the instance being replaced
            self.loader.invalidate(id);
        }
        self.attach(id, screen, Resource::NotAsked);

        self.exec(id, None, skip_load);
        Ok(())
    }

    /// Re-activate a screen whose load is still in flight. Nothing is rendered
    /// until the pending completion arrives.
    fn resume(&mut self, id: ScreenId, screen: Screen) {
        info!("Resuming {} while its load is pending", id);
        let crumb = screen.page().crumb();
        self.attach(id, screen, Resource::Loading);
        self.header.set_crumb(crumb);
        self.footer.show_loading();
    }

    /// Register `screen` as the active one and install its key bindings and footer.
    fn attach(&mut self, id: ScreenId, screen: Screen, state: Resource<String, String>) {
        if let Some(old) = self.unregister(id) {
            debug!("Replacing registered {} (was {:?})", id, old.state);
        }

        if id != ScreenId::Help {
            self.keys.clear();
        }
        self.keys.add(global_keys());
        self.keys.add(screen.page().bind_keys());
        if let Some((scope, actions)) = screen.page().focus_overlay() {
            self.keys.push_overlay(scope, actions);
        }

        let footer = screen.page().footer().to_string();
        self.screens.push(Registered { screen, state });
        self.active = Some(id);
        self.focused = None;
        if id != ScreenId::Help {
            self.current_page = Some(id);
        }

        self.footer
            .show_text(if footer.is_empty() { DEFAULT_FOOTER.to_string() } else { footer });
    }

    /// Run the load/render cycle for a registered screen.
    ///
    /// The crumb and the loading indicator are shown right away; the fetch
    /// (`custom` or the screen's own) runs on a worker and is rendered when
    /// its completion is drained. With `skip_load` it renders immediately.
    pub fn exec(&mut self, id: ScreenId, custom: Option<LoadTask>, skip_load: bool) {
        let Some(registered) = self.screens.iter_mut().find(|r| r.screen.id() == id) else {
            warn!("Cannot run {}: not registered", id);
            return;
        };

        self.header.set_crumb(registered.screen.page().crumb());
        self.footer.show_loading();

        if skip_load {
            self.render_step(id);
            return;
        }

        let task = custom.unwrap_or_else(|| registered.screen.page().load(&self.ctx));
        registered.state = Resource::Loading;
        self.loader.spawn(id, task);
    }

    /// Apply every completion already queued. Called once per frame.
    pub fn poll_loads(&mut self) {
        while let Some(completion) = self.loader.try_next() {
            self.complete(completion);
        }
    }

    /// Wait for the next load to finish and apply it. Returns false when nothing can arrive.
    pub async fn wait_for_load(&mut self) -> bool {
        match self.loader.next().await {
            Some(completion) => {
                self.complete(completion);
                true
            }
            None => false,
        }
    }

    fn complete(&mut self, completion: Completion) {
        let Completion { screen: id, result, .. } = completion;
        let Some(registered) = self.screens.iter_mut().find(|r| r.screen.id() == id) else {
            debug!("Dropping load for unregistered {}", id);
            return;
        };

        let outcome = result.and_then(|loaded| registered.screen.page_mut().apply(loaded));
        match outcome {
            Ok(()) => {
                info!("✅ Loaded {}", id);
                self.render_step(id);
            }
            Err(e) => {
                warn!("❌ Load of {} failed: {:#}", id, e);
                registered.state = Resource::Failure(format!("{:#}", e));
                if self.active == Some(id) {
                    self.footer.show_error(format!("😵 {:#}", e));
                }
            }
        }
    }

    /// Render step: view, then status or footer text, then focus.
    fn render_step(&mut self, id: ScreenId) {
        let Some(registered) = self.screens.iter_mut().find(|r| r.screen.id() == id) else {
            return;
        };

        let status = registered.screen.page_mut().view(&self.keys);
        registered.state = Resource::Success(status.clone());

        if self.active != Some(id) {
            return;
        }

        if !status.is_empty() {
            self.footer.show_status(format!("✅ {}", status));
        } else {
            let footer = registered.screen.page().footer();
            self.footer
                .show_text(if footer.is_empty() { DEFAULT_FOOTER } else { footer });
        }
        self.focused = Some(id);
    }

    /// Route one key event. Returns false once the user has asked to quit.
    pub fn handle_key(&mut self, key: KeyEvent) -> Result<bool> {
        if key.kind == KeyEventKind::Release {
            return Ok(self.running);
        }

        let binding = KeyBinding::from_event(&key);

        // Typed characters belong to an active text input
        let capturing = self.focused_page().is_some_and(|s| s.page().captures_input());
        if !(capturing && binding.is_plain_char()) {
            if let Some(action) = self.keys.lookup(&binding).map(|a| a.action) {
                debug!("Key {} -> {:?}", binding, action);
                let command = self.dispatch(action);
                if !command.is_pass_through() {
                    self.execute(command);
                    return Ok(self.running);
                }
            }
        }

        if let Some(id) = self.focused {
            if let Some(registered) = self.screens.iter_mut().find(|r| r.screen.id() == id) {
                let command = registered.screen.page_mut().handle_input(key, &mut self.ctx);
                self.execute(command);
            }
        }

        Ok(self.running)
    }

    fn dispatch(&mut self, action: Action) -> Command {
        match action {
            Action::Quit => Command::Quit,
            Action::Help => Command::navigate_to(ScreenId::Help),
            Action::ListOrganizations => {
                self.ctx.clear_organization();
                Command::navigate_to(ScreenId::Organizations)
            }
            Action::Screen(action) => {
                let Some(id) = self.active else {
                    return Command::PassThrough;
                };
                // Help lists the bindings of the screen below it but does not run them
                if id == ScreenId::Help && action != ScreenAction::ExitHelp {
                    debug!("Ignoring {:?} while help is open", action);
                    return Command::None;
                }
                match self.screens.iter_mut().find(|r| r.screen.id() == id) {
                    Some(registered) => registered.screen.page_mut().handle_action(action, &mut self.ctx),
                    None => Command::PassThrough,
                }
            }
        }
    }

    pub fn execute(&mut self, command: Command) {
        match command {
            Command::None | Command::PassThrough => {}
            Command::Batch(commands) => {
                for command in commands {
                    self.execute(command);
                }
            }
            Command::NavigateTo(id) => self.navigate(id),
            Command::ReturnTo(id) => {
                let result = match self.unregister(id) {
                    Some(registered) if registered.state.is_loading() => {
                        self.resume(id, registered.screen);
                        Ok(())
                    }
                    // Only a rendered screen is shown as is; anything else is fetched again
                    Some(registered) => {
                        let skip_load = registered.state.is_success();
                        self.activate(id, Some(registered.screen), skip_load)
                    }
                    None => self.activate(id, None, false),
                };
                if let Err(e) = result {
                    warn!("Could not return to {}: {:#}", id, e);
                    self.footer.show_error(format!("😵 {:#}", e));
                }
            }
            Command::Reload(task) => match self.active {
                Some(id) => self.exec(id, Some(task), false),
                None => debug!("Reload requested with no active screen"),
            },
            Command::PushKeys { scope, actions } => self.keys.push_overlay(scope, actions),
            Command::PopKeys(scope) => self.keys.pop_overlay(scope),
            Command::Notify(message) => self.footer.show_status(message),
            Command::Quit => {
                info!("Quit requested");
                self.running = false;
            }
        }
    }

    fn unregister(&mut self, id: ScreenId) -> Option<Registered> {
        let position = self.screens.iter().position(|r| r.screen.id() == id)?;
        Some(self.screens.remove(position))
    }

    fn focused_page(&self) -> Option<&Screen> {
        let id = self.focused?;
        self.screen(id)
    }

    /// Expire footer flashes.
    pub fn tick(&mut self, now: Instant) {
        self.footer.tick(now);
    }

    pub fn render(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Header
                Constraint::Min(0),    // Active screen
                Constraint::Length(1), // Footer
            ])
            .split(frame.area());

        self.header.render(frame, chunks[0], &self.theme);

        if let Some(id) = self.active {
            if let Some(registered) = self.screens.iter_mut().find(|r| r.screen.id() == id) {
                registered.screen.page_mut().render(frame, chunks[1], &self.theme);
            }
        }

        self.footer.render(frame, chunks[2], &self.theme);
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn active(&self) -> Option<ScreenId> {
        self.active
    }

    pub fn focused(&self) -> Option<ScreenId> {
        self.focused
    }

    pub fn context(&self) -> &Context {
        &self.ctx
    }

    pub fn keys(&self) -> &KeyActionRegistry {
        &self.keys
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn footer(&self) -> &Footer {
        &self.footer
    }

    pub fn screen(&self, id: ScreenId) -> Option<&Screen> {
        self.screens.iter().find(|r| r.screen.id() == id).map(|r| &r.screen)
    }

    /// Load state of a registered screen.
    pub fn state(&self, id: ScreenId) -> Option<&Resource<String, String>> {
        self.screens.iter().find(|r| r.screen.id() == id).map(|r| &r.state)
    }

    /// How many screens with `id` are registered (never more than one).
    pub fn registered_count(&self, id: ScreenId) -> usize {
        self.screens.iter().filter(|r| r.screen.id() == id).count()
    }
}
