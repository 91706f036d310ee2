//! Terminal setup, polling wiring and key handling.

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::client::{ApiClient, SessionStatus};
use crate::config::Config;
use crate::controller::{DataEvent, PollController};
use crate::forms::{AuthMode, RecoveryStep, StopForm};

use super::app::{App, Overlay};
use super::render;

/// Run the dashboard TUI until the operator quits.
pub async fn run(config: &Config) -> Result<()> {
    enable_raw_mode().map_err(|e| {
        anyhow::anyhow!(
            "Failed to enable raw mode: {}. Ensure you're running in a real terminal (TTY).",
            e
        )
    })?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).map_err(|e| {
        let _ = disable_raw_mode();
        anyhow::anyhow!("Failed to initialize terminal: {}", e)
    })?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let client = Arc::new(ApiClient::new(&config.api_base)?);
    let (mut controller, mut rx) = PollController::new(
        Arc::clone(&client),
        Duration::from_secs(config.poll_interval_secs.max(1)),
    );
    // Polling begins immediately and is not gated on login state.
    controller.start();

    // Non-blocking session probe; failure silently stays anonymous.
    let (probe_tx, mut probe_rx) = mpsc::channel::<Option<SessionStatus>>(1);
    {
        let client = Arc::clone(&client);
        tokio::spawn(async move {
            let status = client.status().await.ok();
            let _ = probe_tx.send(status).await;
        });
    }

    let mut app = App::new(&config.machine, config.poll_interval_secs.max(1));
    let result = run_event_loop(
        &mut terminal,
        &mut app,
        &client,
        &mut controller,
        &mut rx,
        &mut probe_rx,
    )
    .await;

    // Teardown before releasing the terminal: any in-flight fetch
    // resolving after this point is discarded by the epoch guard.
    controller.stop();

    let cleanup = restore_terminal(&mut terminal);
    result.and(cleanup)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    client: &ApiClient,
    controller: &mut PollController,
    rx: &mut mpsc::Receiver<DataEvent>,
    probe_rx: &mut mpsc::Receiver<Option<SessionStatus>>,
) -> Result<()> {
    loop {
        // Drain fetch results; stale epochs are dropped.
        while let Ok(event) = rx.try_recv() {
            if controller.admit(&event) {
                app.state.apply(event);
                let slices = app.state.pie().len();
                if slices > 0 && app.selected_slice >= slices {
                    app.selected_slice = slices - 1;
                }
            }
        }

        if let Ok(probe) = probe_rx.try_recv() {
            app.session.apply_probe(probe);
        }

        terminal.draw(|f| render::draw(f, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    handle_key(app, key, client, controller).await;
                }
            }
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

async fn handle_key(app: &mut App, key: KeyEvent, client: &ApiClient, controller: &PollController) {
    // Overlays take priority over whatever is behind them.
    if let Some(overlay) = app.overlay.take() {
        let machine = app.state.machine().to_string();
        app.overlay = handle_overlay_key(overlay, key, client, controller, &machine).await;
        return;
    }

    if app.session.logged_in() {
        handle_dashboard_key(app, key, client, controller).await;
    } else {
        handle_auth_key(app, key, client).await;
    }
}

async fn handle_dashboard_key(
    app: &mut App,
    key: KeyEvent,
    client: &ApiClient,
    controller: &PollController,
) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Char('r') => app.overlay = Some(Overlay::StopForm(StopForm::default())),
        KeyCode::Char('l') => {
            // Logout failure is swallowed; the operator is logged out
            // locally either way.
            let _ = client.logout().await;
            app.session.logout();
        }
        KeyCode::Down | KeyCode::Char('j') => app.select_slice(true),
        KeyCode::Up | KeyCode::Char('k') => app.select_slice(false),
        KeyCode::Enter => app.filter_from_selection(),
        KeyCode::Char('c') => app.state.clear_filter(),
        KeyCode::F(5) => controller.refresh_now(),
        _ => {}
    }
}

async fn handle_auth_key(app: &mut App, key: KeyEvent, client: &ApiClient) {
    match key.code {
        KeyCode::Esc => app.should_quit = true,
        KeyCode::Tab | KeyCode::Down => app.focus_next(),
        KeyCode::BackTab | KeyCode::Up => app.focus_prev(),
        KeyCode::F(2) => app.toggle_auth_mode(),
        KeyCode::F(3) => app.overlay = Some(Overlay::Recovery(Default::default())),
        KeyCode::Enter => submit_auth(app, client).await,
        KeyCode::Backspace => {
            app.focused_auth_buffer().pop();
        }
        KeyCode::Char(c) => app.focused_auth_buffer().push(c),
        _ => {}
    }
}

async fn submit_auth(app: &mut App, client: &ApiClient) {
    match app.auth.mode {
        AuthMode::Login => {
            if let Err(e) = app.auth.validate_login() {
                app.auth.error = Some(e);
                return;
            }
            app.auth.submitting = true;
            match client.login(&app.auth.username, &app.auth.password).await {
                Ok(response) => {
                    let typed = app.auth.username.clone();
                    app.session.login(&typed, &response);
                    app.auth = Default::default();
                }
                Err(e) => {
                    app.auth.error = Some(e.to_string());
                    app.auth.submitting = false;
                }
            }
        }
        AuthMode::Register => {
            let request = match app.auth.validate_registration() {
                Ok(r) => r,
                Err(e) => {
                    app.auth.error = Some(e);
                    return;
                }
            };
            app.auth.submitting = true;
            match client.register_user(&request).await {
                Ok(()) => {
                    app.auth.registration_succeeded();
                    app.auth_focus = super::app::AuthField::Username;
                }
                Err(e) => app.auth.error = Some(e.to_string()),
            }
            app.auth.submitting = false;
        }
    }
}

/// Handle a key while an overlay is open. Returns the overlay to keep
/// showing, or `None` when it closed.
async fn handle_overlay_key(
    overlay: Overlay,
    key: KeyEvent,
    client: &ApiClient,
    controller: &PollController,
    machine: &str,
) -> Option<Overlay> {
    match overlay {
        Overlay::StopForm(form) => {
            handle_stop_form_key(form, key, client, controller, machine).await
        }
        Overlay::Recovery(form) => handle_recovery_key(form, key, client).await,
    }
}

async fn handle_stop_form_key(
    mut form: StopForm,
    key: KeyEvent,
    client: &ApiClient,
    controller: &PollController,
    machine: &str,
) -> Option<Overlay> {
    match key.code {
        KeyCode::Esc => return None,
        KeyCode::Left => form.prev_reason(),
        KeyCode::Right => form.next_reason(),
        KeyCode::Backspace => {
            form.duration.pop();
        }
        KeyCode::Char(c) if c.is_ascii_digit() || c == '.' || c == ',' => {
            form.duration.push(c);
        }
        KeyCode::Enter => {
            let (reason, minutes) = match form.validate() {
                Ok(v) => v,
                Err(e) => {
                    form.error = Some(e);
                    return Some(Overlay::StopForm(form));
                }
            };
            form.submitting = true;
            match client.register_stop(reason, minutes, machine).await {
                Ok(()) => {
                    // Reflect the new record promptly instead of
                    // waiting for the next scheduled poll.
                    controller.refresh_now();
                    return None;
                }
                Err(e) => {
                    form.error = Some(e.to_string());
                    form.submitting = false;
                }
            }
        }
        _ => {}
    }
    Some(Overlay::StopForm(form))
}

async fn handle_recovery_key(
    mut form: crate::forms::RecoveryForm,
    key: KeyEvent,
    client: &ApiClient,
) -> Option<Overlay> {
    match key.code {
        KeyCode::Esc => return None,
        KeyCode::Tab if form.step == RecoveryStep::NewPassword => {
            form.confirm_focus = !form.confirm_focus;
        }
        KeyCode::Backspace => {
            let confirm = form.confirm_focus;
            App::recovery_buffer(&mut form, confirm).pop();
        }
        KeyCode::Char(c) => {
            let confirm = form.confirm_focus;
            App::recovery_buffer(&mut form, confirm).push(c);
        }
        KeyCode::Enter => {
            if form.done {
                return None;
            }
            form.submitting = true;
            match form.step {
                RecoveryStep::Email => match client.request_recovery(&form.email).await {
                    Ok(()) => form.code_sent(),
                    Err(e) => form.error = Some(e.to_string()),
                },
                RecoveryStep::Code => match client.verify_code(&form.email, &form.code).await {
                    Ok(()) => form.code_verified(),
                    Err(e) => form.error = Some(e.to_string()),
                },
                RecoveryStep::NewPassword => {
                    if let Err(e) = form.validate_new_password() {
                        form.error = Some(e);
                    } else {
                        match client
                            .reset_password(&form.email, &form.code, &form.new_password)
                            .await
                        {
                            Ok(()) => {
                                form.reset_done();
                                form.done = true;
                            }
                            Err(e) => form.error = Some(e.to_string()),
                        }
                    }
                }
            }
            form.submitting = false;
        }
        _ => {}
    }
    Some(Overlay::Recovery(form))
}
