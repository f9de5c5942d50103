use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use ratatui::layout::{Constraint, Layout};
use tokio::sync::mpsc;
use tracing_appender::non_blocking::WorkerGuard;

use labdesk::action::Action;
use labdesk::app::{App, Effect, InputMode, Overlay, SessionStatus, View};
use labdesk::client::{AdminClient, HttpAdminClient, Session, SessionHandle};
use labdesk::config::{Cli, ConfigFile, Settings};
use labdesk::controller::{ConfirmationGate, Notifier};
use labdesk::event::{key_to_action, AppEvent, RawEventHandler};
use labdesk::feedback::{ChannelNotifier, ModalGate};
use labdesk::input::FormDraft;
use labdesk::kinds::{Controllers, KindId};
use labdesk::widgets;
use labdesk::worker::{CliHandle, CliRequest, CliWorker};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let (file, file_error) = match ConfigFile::load() {
        Ok(file) => (file, None),
        Err(err) => (ConfigFile::default(), Some(err)),
    };
    let settings = Settings::resolve(cli, file);

    // Set up logging. The TUI owns stdout, so logs only go to a file.
    let _guard = init_logging(settings.log_file.as_deref())?;
    if let Some(err) = file_error {
        tracing::warn!("ignoring malformed config file: {}", err);
    }

    run_tui(settings).await
}

fn init_logging(log_file: Option<&str>) -> Result<Option<WorkerGuard>> {
    let Some(log_file) = log_file else {
        return Ok(None);
    };
    let file = std::fs::File::create(log_file)
        .wrap_err_with(|| format!("failed to create log file {}", log_file))?;
    let (writer, guard) = tracing_appender::non_blocking(file);
    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
    Ok(Some(guard))
}

async fn run_tui(settings: Settings) -> Result<()> {
    let session = match (settings.token.clone(), settings.admin_id.clone()) {
        (Some(token), Some(admin_id)) => SessionHandle::with_session(Session { token, admin_id }),
        _ => SessionHandle::new(),
    };

    let client = HttpAdminClient::new(
        &settings.base_url,
        session.clone(),
        settings.timeout,
        settings.page_size,
    )
    .wrap_err("failed to set up admin API client")?;
    let client: Arc<dyn AdminClient> = Arc::new(client);

    // Set up channels
    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();

    let notifier: Arc<dyn Notifier> = Arc::new(ChannelNotifier::new(action_tx.clone()));
    let gate: Arc<dyn ConfirmationGate> = Arc::new(ModalGate::new(action_tx.clone()));
    let controllers = Controllers::new(
        client.clone(),
        notifier,
        gate,
        settings.page_size,
        settings.debounce,
    );

    let (worker, cli_handle) = CliWorker::new(client, action_tx.clone());
    tokio::spawn(worker.run());

    let mut app = App::new(
        controllers.feeds(),
        settings.email.clone().unwrap_or_default(),
    );

    // Each feed gets its own receiver so the UI learns about changes.
    let mut tests_rx = controllers.tests.subscribe();
    let mut registrations_rx = controllers.registrations.subscribe();
    let mut parents_rx = controllers.parents.subscribe();

    // Initial data load
    if session.is_active() {
        app.session = SessionStatus::Active;
        handle_effects(vec![Effect::LoadDashboard], &cli_handle, &controllers, &action_tx);
    } else if let (Some(email), Some(password)) = (settings.email.clone(), settings.password.clone())
    {
        app.session = SessionStatus::LoggingIn;
        handle_effects(
            vec![Effect::Login { email, password }],
            &cli_handle,
            &controllers,
            &action_tx,
        );
    } else {
        app.prompt_login();
    }

    // Set up terminal
    let mut terminal = labdesk::tui::init()?;

    let mut events = RawEventHandler::new(Duration::from_millis(250));

    // Main loop
    loop {
        terminal.draw(|frame| render(&mut app, frame))?;

        let action = tokio::select! {
            Some(event) = events.next() => match event {
                AppEvent::Key(key) => key_to_action(
                    key,
                    &app.view,
                    &app.input_mode,
                    &app.overlay,
                    &app.input_buffer,
                ),
                AppEvent::Tick => Some(Action::Tick),
            },
            Some(action) = action_rx.recv() => Some(action),
            Ok(()) = tests_rx.changed() => Some(Action::ListChanged(KindId::TestService)),
            Ok(()) = registrations_rx.changed() => Some(Action::ListChanged(KindId::Registration)),
            Ok(()) = parents_rx.changed() => Some(Action::ListChanged(KindId::Parent)),
            else => break,
        };

        if let Some(action) = action {
            let effects = app.update(action);
            handle_effects(effects, &cli_handle, &controllers, &action_tx);
        }

        // The client drops the session on any 401.
        if app.session == SessionStatus::Active && !session.is_active() {
            tracing::info!("session expired");
            app.update(Action::SessionExpired);
        }

        if app.should_quit {
            break;
        }
    }

    labdesk::tui::restore()?;

    Ok(())
}

fn render(app: &mut App, frame: &mut ratatui::Frame) {
    let area = frame.area();

    frame.render_widget(
        ratatui::widgets::Block::default()
            .style(ratatui::style::Style::default().bg(labdesk::theme::BG_DARK)),
        area,
    );

    let layout = Layout::vertical([
        Constraint::Length(1), // Tab bar
        Constraint::Fill(1),   // Content
        Constraint::Length(1), // Footer
    ])
    .split(area);

    widgets::tab_bar::render(app, frame, layout[0]);

    let content_area = layout[1];
    match app.view {
        View::Dashboard => widgets::dashboard::render(app, frame, content_area),
        View::Collection(kind) => widgets::collection::render(app, kind, frame, content_area),
        View::RegistrationDetail => {
            widgets::registration_detail::render(app, frame, content_area)
        }
        View::Profile => widgets::profile::render(app, frame, content_area),
    }

    widgets::footer::render(app, frame, layout[2]);

    match &app.overlay {
        Overlay::Help => widgets::help_overlay::render(&app.view, frame, area),
        Overlay::Confirm(prompt) => widgets::confirm_modal::render(prompt, frame, area),
        Overlay::Filters { focus } => widgets::filter_picker::render(app, *focus, frame, area),
        Overlay::Form(form) => widgets::form_modal::render(form, frame, area),
        Overlay::None => {}
    }

    match app.input_mode {
        InputMode::Command => widgets::command_input::render_command_modal(app, frame, area),
        InputMode::Search => widgets::command_input::render_search_modal(app, frame, area),
        _ => {}
    }

    widgets::toast::render(app, frame, area);
}

fn handle_effects(
    effects: Vec<Effect>,
    cli_handle: &CliHandle,
    controllers: &Controllers,
    action_tx: &mpsc::UnboundedSender<Action>,
) {
    for effect in effects {
        match effect {
            Effect::Refresh(kind) => {
                let ops = controllers.ops(kind);
                tokio::spawn(async move { ops.refresh().await });
            }
            Effect::SearchInput(kind, text) => controllers.ops(kind).on_search_input(text),
            Effect::SetFilters(kind, filters) => {
                let ops = controllers.ops(kind);
                tokio::spawn(async move { ops.set_filters(filters).await });
            }
            Effect::NextPage(kind) => {
                let ops = controllers.ops(kind);
                tokio::spawn(async move { ops.next_page().await });
            }
            Effect::PrevPage(kind) => {
                let ops = controllers.ops(kind);
                tokio::spawn(async move { ops.prev_page().await });
            }
            Effect::ToggleStatus(kind, id, current) => {
                let ops = controllers.ops(kind);
                tokio::spawn(async move { ops.toggle_status(id, current).await });
            }
            Effect::Remove(kind, id) => {
                let ops = controllers.ops(kind);
                tokio::spawn(async move { ops.remove(id).await });
            }
            Effect::Submit(kind, target, draft) => submit(kind, target, draft, controllers, action_tx),
            Effect::LoadDashboard => cli_handle.send(CliRequest::LoadDashboard),
            Effect::LoadRegistration(id) => cli_handle.send(CliRequest::LoadRegistration { id }),
            Effect::LoadProfile => cli_handle.send(CliRequest::LoadProfile),
            Effect::UpdateProfile(id, draft) => {
                cli_handle.send(CliRequest::UpdateProfile { id, draft })
            }
            Effect::Login { email, password } => {
                cli_handle.send(CliRequest::Login { email, password })
            }
            Effect::Logout => cli_handle.send(CliRequest::Logout),
            Effect::Quit => {}
        }
    }
}

fn submit(
    kind: KindId,
    target: Option<String>,
    draft: FormDraft,
    controllers: &Controllers,
    action_tx: &mpsc::UnboundedSender<Action>,
) {
    let tx = action_tx.clone();
    let accepted = move |ok: bool| {
        if ok {
            let _ = tx.send(Action::FormAccepted(kind));
        }
    };
    match (kind, draft) {
        (KindId::Parent, FormDraft::Parent(draft)) => {
            let controller = controllers.parents.clone();
            tokio::spawn(async move {
                accepted(controller.submit(target.as_deref(), &draft).await);
            });
        }
        (KindId::TestService, FormDraft::TestService(draft)) => {
            let controller = controllers.tests.clone();
            tokio::spawn(async move {
                accepted(controller.submit(target.as_deref(), &draft).await);
            });
        }
        (KindId::Registration, FormDraft::Registration(draft)) => {
            let controller = controllers.registrations.clone();
            tokio::spawn(async move {
                accepted(controller.submit(target.as_deref(), &draft).await);
            });
        }
        (kind, _) => tracing::warn!(?kind, "form draft does not match its list"),
    }
}
