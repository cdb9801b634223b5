use darkview_core::{
    CommitOutcome, DocumentId, DocumentInfo, PanLimits, PanOffset, Phase, Point, Raster, RenderFailure,
    RenderTicket, Selection, Session, Viewer, ViewerError,
};
use iced::widget::scrollable::{AbsoluteOffset, Direction, Scrollbar, Viewport};
use iced::widget::{
    button, column, container, horizontal_space, image as img, mouse_area, row, scrollable, text, text_input,
};
use iced::{event, window, Alignment, Color, Element, Event, Length, Subscription, Task, Theme};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod config;
mod file;
mod renderer;
mod worker;

use config::AppConfig;
use file::ChosenFile;
use worker::RenderWorker;

fn main() -> iced::Result {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("darkview_viewer=debug,darkview_core=debug,info")),
        )
        .init();

    let config = config::load().unwrap_or_else(|err| {
        tracing::warn!("Using default configuration: {err:#}");
        AppConfig::default()
    });

    iced::application("DarkMode Document Viewer", DocumentViewer::update, DocumentViewer::view)
        .subscription(DocumentViewer::subscription)
        .theme(|_| Theme::Dark)
        .run_with(move || DocumentViewer::new(config.clone()))
}

#[derive(Debug, Clone)]
enum Message {
    EngineReady(Result<(), String>),
    OpenFile,
    FileChosen(Option<ChosenFile>),
    FileDropped(PathBuf),
    DocumentLoaded(DocumentId, Result<DocumentInfo, ViewerError>),
    PageRendered(RenderTicket, Result<Raster, RenderFailure>),
    PreviousPage,
    NextPage,
    JumpInputChanged(String),
    ConfirmJump,
    ZoomIn,
    ZoomOut,
    ToggleDarkMode,
    PointerPressed,
    PointerMoved(iced::Point),
    PointerReleased,
    PointerLeft,
    Scrolled(Viewport),
}

struct DocumentViewer {
    viewer: Viewer,
    worker: RenderWorker,
    /// Committed raster, moved out of the viewer for display
    surface: Option<img::Handle>,
}

fn surface_id() -> scrollable::Id {
    scrollable::Id::new("page-surface")
}

impl DocumentViewer {
    fn new(config: AppConfig) -> (Self, Task<Message>) {
        let (worker, ready) = RenderWorker::spawn(config.pdfium_library_dir);
        let viewer = Viewer::new(config.viewer).unwrap_or_else(|err| {
            tracing::warn!("Using default zoom settings: {err}");
            Viewer::default()
        });
        (
            Self {
                viewer,
                worker,
                surface: None,
            },
            Task::perform(
                async move {
                    ready
                        .await
                        .unwrap_or_else(|_| Err("render worker exited during startup".to_string()))
                },
                Message::EngineReady,
            ),
        )
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::EngineReady(Ok(())) => {
                tracing::info!("Rendering engine ready");
            }
            Message::EngineReady(Err(reason)) => {
                self.surface = None;
                self.viewer.engine_failed(reason);
            }
            Message::OpenFile => {
                return Task::perform(file::choose(), Message::FileChosen);
            }
            Message::FileChosen(Some(file)) => return self.open(file),
            Message::FileChosen(None) => {
                tracing::debug!("File dialog closed");
            }
            Message::FileDropped(path) => return self.open(ChosenFile::from_path(path)),
            Message::DocumentLoaded(document, result) => {
                let ticket = self.viewer.document_loaded(document, result);
                return self.render(ticket);
            }
            Message::PageRendered(ticket, result) => {
                if self.viewer.commit(ticket, result) == CommitOutcome::Committed {
                    self.surface = self.viewer.take_surface().map(to_handle);
                }
            }
            Message::PreviousPage => return self.render_then_scroll(Viewer::prev_page),
            Message::NextPage => return self.render_then_scroll(Viewer::next_page),
            Message::JumpInputChanged(input) => self.viewer.set_jump_input(input),
            Message::ConfirmJump => return self.render_then_scroll(Viewer::confirm_jump),
            Message::ZoomIn => {
                let ticket = self.viewer.zoom_in();
                return self.render(ticket);
            }
            Message::ZoomOut => {
                let ticket = self.viewer.zoom_out();
                return self.render(ticket);
            }
            Message::ToggleDarkMode => {
                let ticket = self.viewer.toggle_dark_mode();
                return self.render(ticket);
            }
            Message::PointerPressed => self.viewer.pointer_pressed(),
            Message::PointerMoved(position) => {
                if let Some(pan) = self.viewer.pointer_moved(Point::new(position.x, position.y)) {
                    return scroll_to(pan);
                }
            }
            Message::PointerReleased => self.viewer.pointer_released(),
            Message::PointerLeft => self.viewer.pointer_left(),
            Message::Scrolled(viewport) => {
                let offset = viewport.absolute_offset();
                let bounds = viewport.bounds();
                let content = viewport.content_bounds();
                self.viewer.scrolled(
                    PanOffset::new(offset.x, offset.y),
                    PanLimits::new(content.width - bounds.width, content.height - bounds.height),
                );
            }
        }
        Task::none()
    }

    fn open(&mut self, file: ChosenFile) -> Task<Message> {
        let document = match self.viewer.open(file.name(), file.media_type()) {
            Selection::Load(document) => document,
            Selection::Release => {
                self.surface = None;
                self.worker.release();
                return Task::none();
            }
            Selection::Ignored => return Task::none(),
        };
        self.surface = None;
        tracing::debug!("Reading {}", file.path().display());

        let worker = self.worker.clone();
        Task::perform(
            async move {
                match file.read().await {
                    Ok(bytes) => worker.load(document, bytes).await,
                    Err(err) => {
                        worker.release();
                        Err(err)
                    }
                }
            },
            move |result| Message::DocumentLoaded(document, result),
        )
    }

    fn render(&self, ticket: Option<RenderTicket>) -> Task<Message> {
        match ticket {
            Some(ticket) => Task::perform(self.worker.clone().render(ticket), move |result| {
                Message::PageRendered(ticket, result)
            }),
            None => Task::none(),
        }
    }

    /// Page changes reset the pan offset; bring the surface back to the top
    fn render_then_scroll(&mut self, command: fn(&mut Viewer) -> Option<RenderTicket>) -> Task<Message> {
        match command(&mut self.viewer) {
            Some(ticket) => Task::batch([self.render(Some(ticket)), scroll_to(PanOffset::ZERO)]),
            None => Task::none(),
        }
    }

    fn subscription(&self) -> Subscription<Message> {
        event::listen_with(|event, _status, _window| match event {
            Event::Window(window::Event::FileDropped(path)) => Some(Message::FileDropped(path)),
            _ => None,
        })
    }

    fn view(&self) -> Element<Message> {
        let header = row![
            text("DarkMode Document Viewer").size(24),
            horizontal_space(),
            button("Open file").on_press(Message::OpenFile),
        ]
        .spacing(10)
        .padding(10)
        .align_y(Alignment::Center);

        let body = match self.viewer.phase() {
            Phase::Empty => centered(
                column![
                    text("Upload your document").size(32),
                    text("PDF or image files. Click \"Open file\" or drop a file here.").size(16),
                    button("Open file").on_press(Message::OpenFile),
                ]
                .spacing(20)
                .align_x(Alignment::Center),
            ),
            Phase::Loading { file_name, .. } => centered(text(format!("Loading {file_name}..."))),
            Phase::Unsupported { .. } => centered(text("Unsupported file type")),
            Phase::EngineUnavailable { reason } => centered(
                column![
                    text("The PDF rendering engine could not be started")
                        .size(28)
                        .color(Color::from_rgb(0.95, 0.35, 0.35)),
                    text(reason.as_str()).size(14),
                    text("No document can be displayed until PDFium is installed.").size(14),
                ]
                .spacing(12)
                .align_x(Alignment::Center),
            ),
            Phase::Ready(session) => self.document_view(session),
        };

        column![header, body].into()
    }

    fn document_view<'a>(&'a self, session: &'a Session) -> Element<'a, Message> {
        let view = session.view();
        let toolbar = row![
            button("◀").on_press_maybe(view.can_go_back().then_some(Message::PreviousPage)),
            text(view.page_label()),
            button("▶").on_press_maybe(view.can_go_forward().then_some(Message::NextPage)),
            text_input("Page", self.viewer.jump_input())
                .on_input(Message::JumpInputChanged)
                .on_submit(Message::ConfirmJump)
                .width(Length::Fixed(64.0)),
            button("Go").on_press(Message::ConfirmJump),
            button("+").on_press(Message::ZoomIn),
            text(format!("{}%", (view.scale() * 100.0).round() as i32)),
            button("−").on_press(Message::ZoomOut),
            button(view.dark_mode_toggle_label()).on_press(Message::ToggleDarkMode),
        ]
        .spacing(10)
        .padding(10)
        .align_y(Alignment::Center);

        let page: Element<Message> = match &self.surface {
            Some(handle) => mouse_area(
                scrollable(container(img(handle.clone())).padding(10))
                    .id(surface_id())
                    .direction(Direction::Both {
                        vertical: Scrollbar::default(),
                        horizontal: Scrollbar::default(),
                    })
                    .on_scroll(Message::Scrolled)
                    .width(Length::Fill)
                    .height(Length::Fill),
            )
            .on_press(Message::PointerPressed)
            .on_release(Message::PointerReleased)
            .on_move(Message::PointerMoved)
            .on_exit(Message::PointerLeft)
            .into(),
            None => centered(text("Rendering page...")),
        };

        let mut content = column![toolbar].align_x(Alignment::Center);
        if let Some(failure) = session.last_failure() {
            content = content.push(text(failure.to_string()).size(12).color(Color::from_rgb(0.95, 0.6, 0.3)));
        }
        content.push(page).into()
    }
}

fn centered<'a>(content: impl Into<Element<'a, Message>>) -> Element<'a, Message> {
    container(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .into()
}

fn scroll_to(pan: PanOffset) -> Task<Message> {
    scrollable::scroll_to(surface_id(), AbsoluteOffset { x: pan.x, y: pan.y })
}

fn to_handle(raster: Raster) -> img::Handle {
    let (width, height) = raster.dimensions();
    img::Handle::from_rgba(width, height, raster.into_raw())
}
