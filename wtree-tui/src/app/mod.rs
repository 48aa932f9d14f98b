mod dispatch;

use crate::{components, keymap, theme::Theme};
use components::AppLayout;
use crossterm::event::{self, Event, KeyEventKind};
use dispatch::Dispatcher;
use ratatui::{DefaultTerminal, Frame};
use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
        mpsc,
    },
    time::Duration,
};
use wtree_core::{
    config::KeysConfig,
    event::AppEvent,
    git::GitProvider,
    opener::Opener,
    state::AppState,
    update::{Effect, update},
};

/// Handle for dispatching background work
#[derive(Clone)]
pub struct EventSender {
    tx: mpsc::Sender<AppEvent>,
    cancel: Arc<AtomicBool>,
}

impl EventSender {
    /// Send an event from a background thread to the main loop
    pub fn send(&self, event: AppEvent) {
        let _ = self.tx.send(event);
    }
}

/// Run the interactive UI until the user quits.
pub fn run(
    terminal: &mut DefaultTerminal,
    state: &mut AppState,
    git: &Arc<dyn GitProvider>,
    opener: &Arc<dyn Opener>,
    theme: &Theme,
    keys: &KeysConfig,
) -> anyhow::Result<()> {
    let (tx, rx) = mpsc::channel::<AppEvent>();
    let cancel = Arc::new(AtomicBool::new(false));
    let event_sender = EventSender {
        tx,
        cancel: Arc::clone(&cancel),
    };
    let dispatcher = Dispatcher::new(git, opener, &event_sender);

    let size = terminal.size()?;
    apply(
        AppEvent::Resize {
            width: size.width,
            height: size.height,
        },
        state,
        &dispatcher,
    );
    dispatch_all(vec![Effect::RefreshWorktrees, Effect::RefreshBranches], &dispatcher);

    loop {
        terminal.draw(|f| draw(f, state, theme, keys))?;

        // Check background channel (non-blocking)
        if let Ok(app_event) = rx.try_recv() {
            if !apply(app_event, state, &dispatcher) {
                break;
            }
            continue;
        }

        // Poll terminal events with a timeout so worker results are picked up promptly
        if event::poll(Duration::from_millis(80))? {
            let app_event = match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    keymap::resolve_action(key, state, keys).map(AppEvent::KeyInput)
                }
                Event::Resize(width, height) => Some(AppEvent::Resize { width, height }),
                _ => None,
            };
            if let Some(app_event) = app_event
                && !apply(app_event, state, &dispatcher)
            {
                break;
            }
        }
    }

    // Signal cancellation to background threads
    cancel.store(true, Ordering::Relaxed);
    log::info!("exiting");
    Ok(())
}

/// Feed one event through the state machine and start the resulting work.
/// Returns `false` once the user has asked to quit.
fn apply(event: AppEvent, state: &mut AppState, dispatcher: &Dispatcher) -> bool {
    dispatch_all(update(state, event), dispatcher)
}

fn dispatch_all(effects: Vec<Effect>, dispatcher: &Dispatcher) -> bool {
    effects.into_iter().all(|effect| dispatcher.dispatch(effect))
}

fn draw(f: &mut Frame, state: &AppState, theme: &Theme, keys: &KeysConfig) {
    let layout = AppLayout::new(f.area());

    components::header::draw(f, layout.header, state, theme);
    components::input_bar::draw(f, layout.input, state, theme);
    if state.mode.shows_branches() {
        components::branch_list::draw(f, layout.list, state, theme);
    } else {
        components::worktree_list::draw(f, layout.list, state, theme);
    }
    components::status_line::draw(f, layout.status, state, theme);
    components::footer::draw(f, layout.footer, state, theme, keys);
}
