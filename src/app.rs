use std::path::PathBuf;
use std::sync::Arc;

use futures::StreamExt;
use iced::{window, Subscription, Task};

use crate::application::{
    notifier::{self, Activation},
    session_events, CompletionNotifier, DownloadSequencer, SessionEvent,
};
use crate::domain::{AppError, Item, MediaFormat};
use crate::tools::{config, PlaylistResolver, TokioProcessRunner, ToolConfig, YtDlpPlaylistResolver};
use crate::ui::{
    dialogs, DownloadMessage, DownloadView, LinkMessage, LinkView, SelectionMessage, SelectionView,
};
use crate::utils::{classify_link, LinkKind};

const SINGLE_VIDEO_LABEL: &str = "Single video";

/// The active screen. Items move between screens by value.
enum Screen {
    Link(LinkView),
    Selection(SelectionView),
    Download(DownloadView),
}

struct Services {
    sequencer: Arc<DownloadSequencer<TokioProcessRunner>>,
    resolver: Arc<dyn PlaylistResolver>,
}

pub struct DownloadApp {
    screen: Screen,
    services: Result<Services, AppError>,
    notifier: CompletionNotifier,
}

impl Default for DownloadApp {
    fn default() -> Self {
        Self::new()
    }
}

impl DownloadApp {
    pub fn new() -> Self {
        let services = ToolConfig::discover().map(|tools| Services {
            resolver: Arc::new(YtDlpPlaylistResolver::new(tools.clone())),
            sequencer: Arc::new(DownloadSequencer::new(TokioProcessRunner, tools)),
        });

        let mut link = LinkView::default();
        if let Err(e) = &services {
            log::error!("{e}");
            link.status_message = e.to_string();
        }

        Self {
            screen: Screen::Link(link),
            services,
            notifier: CompletionNotifier::new(config::notify_delay()),
        }
    }

    fn session_running(&self) -> bool {
        let view_busy = matches!(&self.screen, Screen::Download(view) if view.is_downloading);
        let sequencer_busy = self
            .services
            .as_ref()
            .is_ok_and(|services| services.sequencer.is_running());
        view_busy || sequencer_busy
    }

    fn take_screen(&mut self) -> Screen {
        std::mem::replace(&mut self.screen, Screen::Link(LinkView::default()))
    }

    fn set_link_status(&mut self, message: String) {
        if let Screen::Link(view) = &mut self.screen {
            view.is_resolving = false;
            view.status_message = message;
        }
    }
}

#[derive(Debug, Clone)]
pub enum Message {
    Link(LinkMessage),
    Selection(SelectionMessage),
    Download(DownloadMessage),
    PlaylistResolved(Result<Vec<Item>, AppError>),
    DestinationPicked(MediaFormat, Option<PathBuf>),
    Session(SessionEvent),
    NoticeExpired(u64),
    ExitRequested,
    ExitConfirmed(bool),
}

pub fn update(app: &mut DownloadApp, message: Message) -> Task<Message> {
    match message {
        Message::Link(msg) => {
            let Screen::Link(view) = &mut app.screen else {
                return Task::none();
            };
            view.update(msg.clone());

            match msg {
                LinkMessage::ConfirmPressed if !view.is_resolving => return confirm_link(app),
                LinkMessage::ExitPressed => return request_exit(app),
                _ => {}
            }
        }
        Message::PlaylistResolved(result) => match result {
            Ok(items) => {
                if matches!(app.screen, Screen::Link(_)) {
                    app.screen = Screen::Selection(SelectionView::new(items));
                }
            }
            Err(e) => {
                log::warn!("{e}");
                app.set_link_status(e.to_string());
            }
        },
        Message::Selection(msg) => {
            let Screen::Selection(view) = &mut app.screen else {
                return Task::none();
            };
            view.update(msg.clone());

            match msg {
                SelectionMessage::ConfirmPressed => {
                    if let Screen::Selection(view) = app.take_screen() {
                        app.screen = Screen::Download(DownloadView::new(view.items));
                    }
                }
                SelectionMessage::BackPressed => {
                    app.screen = Screen::Link(LinkView::default());
                }
                SelectionMessage::ExitPressed => return request_exit(app),
                SelectionMessage::ItemToggled(_) => {}
            }
        }
        Message::Download(msg) => {
            let Screen::Download(view) = &mut app.screen else {
                return Task::none();
            };

            match msg {
                DownloadMessage::DownloadPressed(format) => {
                    if view.is_downloading {
                        return Task::none();
                    }
                    // Step 1: ask where to put the files
                    return Task::perform(dialogs::pick_destination(), move |dir| {
                        Message::DestinationPicked(format, dir)
                    });
                }
                DownloadMessage::NoticePressed(id) => {
                    app.notifier.activate(id);
                }
                DownloadMessage::BackPressed => {
                    if !view.is_downloading {
                        app.screen = Screen::Link(LinkView::default());
                    }
                }
                DownloadMessage::ExitPressed => return request_exit(app),
            }
        }
        Message::DestinationPicked(format, dir) => {
            let Some(dir) = dir else {
                // User cancelled dialog
                return Task::none();
            };
            return start_session(app, format, dir);
        }
        Message::Session(event) => {
            let Screen::Download(view) = &mut app.screen else {
                return Task::none();
            };

            match event {
                SessionEvent::Log(line) => view.log.push(line),
                SessionEvent::Finished(result) => {
                    view.is_downloading = false;
                    match result {
                        Ok(outcome) => {
                            for failed in outcome.results.iter().filter(|r| !r.is_success()) {
                                log::warn!("Not downloaded: {}", failed.item.source_url);
                            }
                            let destination = outcome.destination.clone();
                            let id = app.notifier.notify(
                                "Download complete",
                                outcome.format.completion_message(),
                                reveal(destination),
                            );
                            return Task::perform(
                                notifier::expiry(app.notifier.delay(), id),
                                Message::NoticeExpired,
                            );
                        }
                        Err(e) => log::info!("Session ended without downloads: {e}"),
                    }
                }
            }
        }
        Message::NoticeExpired(id) => {
            app.notifier.expire(id);
        }
        Message::ExitRequested => return request_exit(app),
        Message::ExitConfirmed(leave) => {
            if leave {
                log::warn!("Exiting with a download session still running");
                return iced::exit();
            }
        }
    }
    Task::none()
}

fn confirm_link(app: &mut DownloadApp) -> Task<Message> {
    let Screen::Link(view) = &mut app.screen else {
        return Task::none();
    };

    let kind = match classify_link(&view.link) {
        Ok(kind) => kind,
        Err(e) => {
            view.status_message = e.to_string();
            return Task::none();
        }
    };
    let services = match &app.services {
        Ok(services) => services,
        Err(e) => {
            view.status_message = e.to_string();
            return Task::none();
        }
    };

    match kind {
        LinkKind::Single(url) => {
            let items = vec![Item::placeholder(url, SINGLE_VIDEO_LABEL)];
            app.screen = Screen::Download(DownloadView::new(items));
            Task::none()
        }
        LinkKind::Playlist(url) => {
            view.is_resolving = true;
            view.status_message = "Fetching playlist...".to_string();
            Task::perform(services.resolver.resolve(url), Message::PlaylistResolved)
        }
    }
}

fn start_session(app: &mut DownloadApp, format: MediaFormat, destination: PathBuf) -> Task<Message> {
    let Screen::Download(view) = &mut app.screen else {
        return Task::none();
    };
    if view.is_downloading {
        view.log.push(AppError::SessionActive.to_string());
        return Task::none();
    }
    let sequencer = match &app.services {
        Ok(services) => Arc::clone(&services.sequencer),
        Err(e) => {
            view.log.push(e.to_string());
            return Task::none();
        }
    };
    if sequencer.is_running() {
        view.log.push(AppError::SessionActive.to_string());
        return Task::none();
    }

    view.log.clear();
    view.is_downloading = true;
    view.destination = Some(destination.clone());

    // Step 2: stream the session back into the view
    let events = session_events(sequencer, view.items.clone(), format, destination);
    Task::stream(events.map(Message::Session))
}

fn request_exit(app: &DownloadApp) -> Task<Message> {
    if app.session_running() {
        Task::perform(dialogs::confirm_exit(), Message::ExitConfirmed)
    } else {
        iced::exit()
    }
}

fn reveal(destination: PathBuf) -> Activation {
    Box::new(move || {
        if let Err(e) = open::that_detached(&destination) {
            log::warn!("Failed to open {}: {e}", destination.display());
        }
    })
}

pub fn view(app: &DownloadApp) -> iced::Element<'_, Message> {
    match &app.screen {
        Screen::Link(view) => view.view().map(Message::Link),
        Screen::Selection(view) => view.view().map(Message::Selection),
        Screen::Download(view) => view.view(app.notifier.current()).map(Message::Download),
    }
}

pub fn subscription(_app: &DownloadApp) -> Subscription<Message> {
    window::close_requests().map(|_| Message::ExitRequested)
}
