use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ia_core::palette::PaletteId;
use ia_core::pixel::{AsciiArt, PixelBuffer};
use ia_core::settings::{BRIGHTNESS_MAX, BRIGHTNESS_MIN, ConvertSettings, SCALE_MAX, SCALE_MIN};
use ia_export::rasterizer::ExportStyle;
use ia_render::ui::{DrawContext, UiState};
use ratatui::DefaultTerminal;

use crate::worker::{ConvertJob, ConvertOutcome};

/// Event poll cadence for the preview loop.
const TICK: Duration = Duration::from_millis(33);

/// Main application state: the loaded image, the settings being edited, the
/// latest artifact, and the single-flight conversion bookkeeping.
pub struct App {
    /// Current UI state.
    pub state: UiState,
    /// Settings as currently edited.
    pub settings: ConvertSettings,
    /// Decoded source image, shared with the worker.
    pub image: Option<Arc<PixelBuffer>>,
    /// File name of the loaded image (sidebar display).
    pub image_name: Option<String>,
    /// Latest completed artifact.
    pub art: Option<AsciiArt>,
    /// Canvas scroll offset.
    pub scroll: (u16, u16),
    /// Bumped on every image/settings change; outcomes from older
    /// generations are discarded as stale.
    pub generation: u64,
    /// Generation of the job currently on the worker, if any.
    pub inflight: Option<u64>,
    /// True when `generation` has not been dispatched yet.
    pub dirty: bool,
    /// One-line status message shown in the status bar.
    pub status: String,
    /// Palette editor buffer.
    pub palette_edit_buf: String,
    /// Cursor position in the palette editor, in chars.
    pub palette_edit_cursor: usize,
    /// Colors and glyph size for PNG export, resolved from the CLI.
    pub export_style: ExportStyle,
    /// Deferred native-dialog requests (run between draws, teacher-style).
    open_requested: bool,
    save_requested: bool,
    export_requested: bool,
    job_tx: flume::Sender<ConvertJob>,
    outcome_rx: flume::Receiver<ConvertOutcome>,
}

impl App {
    /// Create the app around an already-spawned conversion worker.
    #[must_use]
    pub fn new(
        settings: ConvertSettings,
        export_style: ExportStyle,
        job_tx: flume::Sender<ConvertJob>,
        outcome_rx: flume::Receiver<ConvertOutcome>,
    ) -> Self {
        Self {
            state: UiState::Running,
            settings,
            image: None,
            image_name: None,
            art: None,
            scroll: (0, 0),
            generation: 0,
            inflight: None,
            dirty: false,
            status: String::new(),
            palette_edit_buf: String::new(),
            palette_edit_cursor: 0,
            export_style,
            open_requested: false,
            save_requested: false,
            export_requested: false,
            job_tx,
            outcome_rx,
        }
    }

    /// Load an image from disk and schedule the first conversion.
    pub fn load_image(&mut self, path: &Path) {
        match ia_source::load_image(path) {
            Ok(buffer) => {
                self.image = Some(Arc::new(buffer));
                self.image_name = path.file_name().and_then(|n| n.to_str()).map(String::from);
                self.art = None;
                self.scroll = (0, 0);
                self.mark_dirty();
                self.status.clear();
            }
            Err(e) => {
                log::error!("{e}");
                self.status = e.to_string();
            }
        }
    }

    /// Main event loop: poll input, run deferred dialogs, dispatch at most
    /// one conversion, apply fresh outcomes, draw.
    ///
    /// # Errors
    /// Returns an error if terminal operations fail.
    pub fn run(&mut self, mut terminal: DefaultTerminal) -> Result<()> {
        loop {
            if self.state == UiState::Quitting {
                break;
            }

            if event::poll(TICK)? {
                self.handle_event(&event::read()?);
            }
            while event::poll(Duration::ZERO)? {
                self.handle_event(&event::read()?);
            }

            if self.open_requested {
                self.open_requested = false;
                self.open_image_dialog(&mut terminal);
            }
            if self.save_requested {
                self.save_requested = false;
                self.save_text_dialog(&mut terminal);
            }
            if self.export_requested {
                self.export_requested = false;
                self.export_png_dialog(&mut terminal);
            }

            self.dispatch_conversion();
            self.apply_outcomes();

            let ctx = DrawContext {
                art: self.art.as_ref(),
                settings: &self.settings,
                image_name: self.image_name.as_deref(),
                status: &self.status,
                converting: self.inflight.is_some(),
                scroll: self.scroll,
                state: self.state.clone(),
                palette_edit: if self.state == UiState::PaletteEdit {
                    Some((self.palette_edit_buf.as_str(), self.palette_edit_cursor))
                } else {
                    None
                },
            };
            terminal.draw(|frame| ia_render::draw(frame, &ctx))?;
        }
        Ok(())
    }

    /// Send the current snapshot to the worker if it changed and nothing is
    /// in flight. Single-flight: a new request supersedes interest in any
    /// stale prior result, never interrupts it.
    fn dispatch_conversion(&mut self) {
        if !self.dirty || self.inflight.is_some() {
            return;
        }
        let Some(ref image) = self.image else {
            self.dirty = false;
            return;
        };
        let job = ConvertJob {
            generation: self.generation,
            image: Arc::clone(image),
            settings: self.settings.clone(),
        };
        if self.job_tx.send(job).is_ok() {
            self.inflight = Some(self.generation);
            self.dirty = false;
        } else {
            self.status = "conversion worker is gone".into();
        }
    }

    /// Drain worker outcomes; keep only results for the current generation.
    fn apply_outcomes(&mut self) {
        while let Ok(outcome) = self.outcome_rx.try_recv() {
            if Some(outcome.generation) == self.inflight {
                self.inflight = None;
            }
            if outcome.generation != self.generation {
                log::debug!("discarding stale outcome (gen {})", outcome.generation);
                continue;
            }
            match outcome.result {
                Ok(art) => {
                    self.art = Some(art);
                    self.status.clear();
                }
                Err(e) => self.status = e.to_string(),
            }
        }
    }

    /// Record a settings/image change: next loop turn re-converts.
    fn mark_dirty(&mut self) {
        self.generation += 1;
        self.dirty = true;
    }

    /// Apply a mutation to the settings and schedule a re-conversion.
    fn update_settings<F: FnOnce(&mut ConvertSettings)>(&mut self, f: F) {
        f(&mut self.settings);
        self.mark_dirty();
    }

    /// Handle one terminal event.
    pub fn handle_event(&mut self, event: &Event) {
        if let Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) = *event
        {
            if modifiers.contains(KeyModifiers::CONTROL) {
                if let KeyCode::Char('o') = code {
                    self.open_requested = true;
                }
                return;
            }
            if self.state == UiState::PaletteEdit {
                self.handle_palette_edit_key(code);
                return;
            }

            match code {
                KeyCode::Char('q') => self.state = UiState::Quitting,
                KeyCode::Esc => {
                    if self.state == UiState::Help {
                        self.state = UiState::Running;
                    } else {
                        self.state = UiState::Quitting;
                    }
                }
                KeyCode::Char('?') => {
                    self.state = if self.state == UiState::Help {
                        UiState::Running
                    } else {
                        UiState::Help
                    };
                }
                KeyCode::Char('o') => self.open_requested = true,
                KeyCode::Char('s') => self.save_requested = true,
                KeyCode::Char('e') => self.export_requested = true,
                KeyCode::Char('C') => {
                    self.palette_edit_buf.clone_from(&self.settings.palette);
                    self.palette_edit_cursor = self.palette_edit_buf.chars().count();
                    self.state = UiState::PaletteEdit;
                }
                _ => self.handle_settings_key(code),
            }
        }
    }

    /// Settings and scroll keys.
    fn handle_settings_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('1') => self.set_palette(PaletteId::Standard),
            KeyCode::Char('2') => self.set_palette(PaletteId::Detailed),
            KeyCode::Char('3') => self.set_palette(PaletteId::Simple),
            KeyCode::Char('4') => self.set_palette(PaletteId::Blocks),
            KeyCode::Char('5') => self.set_palette(PaletteId::Dots),
            KeyCode::Char('i') => self.update_settings(|s| s.invert = !s.invert),
            KeyCode::Char('[') => self.update_settings(|s| {
                s.width_scale = (s.width_scale - 10.0).max(SCALE_MIN);
            }),
            KeyCode::Char(']') => self.update_settings(|s| {
                s.width_scale = (s.width_scale + 10.0).min(SCALE_MAX);
            }),
            KeyCode::Char('{') => self.update_settings(|s| {
                s.height_scale = (s.height_scale - 10.0).max(SCALE_MIN);
            }),
            KeyCode::Char('}') => self.update_settings(|s| {
                s.height_scale = (s.height_scale + 10.0).min(SCALE_MAX);
            }),
            KeyCode::Char('-') => self.update_settings(|s| {
                s.brightness = (s.brightness - 0.1).max(BRIGHTNESS_MIN);
            }),
            KeyCode::Char('+' | '=') => self.update_settings(|s| {
                s.brightness = (s.brightness + 0.1).min(BRIGHTNESS_MAX);
            }),
            KeyCode::Char('r') => {
                self.settings = ConvertSettings::default();
                self.mark_dirty();
                self.status = "settings reset".into();
            }
            KeyCode::Up => self.scroll.1 = self.scroll.1.saturating_sub(1),
            KeyCode::Down => self.scroll.1 = self.scroll.1.saturating_add(1),
            KeyCode::Left => self.scroll.0 = self.scroll.0.saturating_sub(1),
            KeyCode::Right => self.scroll.0 = self.scroll.0.saturating_add(1),
            KeyCode::PageUp => self.scroll.1 = self.scroll.1.saturating_sub(10),
            KeyCode::PageDown => self.scroll.1 = self.scroll.1.saturating_add(10),
            KeyCode::Home => self.scroll = (0, 0),
            _ => {}
        }
    }

    fn set_palette(&mut self, id: PaletteId) {
        self.update_settings(|s| s.set_palette(id));
        self.status = format!("palette: {}", id.name());
    }

    /// Palette editor keys. Enter applies (≥ 2 chars), Esc cancels.
    fn handle_palette_edit_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => self.state = UiState::Running,
            KeyCode::Enter => {
                if self.palette_edit_buf.chars().count() >= 2 {
                    let palette = self.palette_edit_buf.clone();
                    self.update_settings(|s| s.palette = palette);
                    self.state = UiState::Running;
                } else {
                    self.status = "palette needs at least 2 characters".into();
                }
            }
            KeyCode::Backspace => {
                if self.palette_edit_cursor > 0 {
                    let mut chars: Vec<char> = self.palette_edit_buf.chars().collect();
                    chars.remove(self.palette_edit_cursor - 1);
                    self.palette_edit_buf = chars.into_iter().collect();
                    self.palette_edit_cursor -= 1;
                }
            }
            KeyCode::Delete => {
                let mut chars: Vec<char> = self.palette_edit_buf.chars().collect();
                if self.palette_edit_cursor < chars.len() {
                    chars.remove(self.palette_edit_cursor);
                    self.palette_edit_buf = chars.into_iter().collect();
                }
            }
            KeyCode::Left => self.palette_edit_cursor = self.palette_edit_cursor.saturating_sub(1),
            KeyCode::Right => {
                if self.palette_edit_cursor < self.palette_edit_buf.chars().count() {
                    self.palette_edit_cursor += 1;
                }
            }
            KeyCode::Home => self.palette_edit_cursor = 0,
            KeyCode::End => self.palette_edit_cursor = self.palette_edit_buf.chars().count(),
            KeyCode::Char(ch) => {
                let mut chars: Vec<char> = self.palette_edit_buf.chars().collect();
                chars.insert(self.palette_edit_cursor, ch);
                self.palette_edit_buf = chars.into_iter().collect();
                self.palette_edit_cursor += 1;
            }
            _ => {}
        }
    }

    /// Suspend the TUI, open a native dialog, restore the TUI.
    fn pick_file(
        terminal: &mut DefaultTerminal,
        title: &str,
        filters: &[(&str, &[&str])],
        save_name: Option<&str>,
    ) -> Option<std::path::PathBuf> {
        crossterm::terminal::disable_raw_mode().ok();
        crossterm::execute!(std::io::stdout(), crossterm::terminal::LeaveAlternateScreen).ok();

        let mut dialog = rfd::FileDialog::new().set_title(title);
        for &(name, exts) in filters {
            dialog = dialog.add_filter(name, exts);
        }
        let picked = if let Some(name) = save_name {
            dialog.set_file_name(name).save_file()
        } else {
            dialog.pick_file()
        };

        crossterm::terminal::enable_raw_mode().ok();
        crossterm::execute!(std::io::stdout(), crossterm::terminal::EnterAlternateScreen).ok();
        terminal.clear().ok();

        picked
    }

    fn open_image_dialog(&mut self, terminal: &mut DefaultTerminal) {
        let filters: &[(&str, &[&str])] = &[("Images", ia_source::IMAGE_EXTENSIONS)];
        if let Some(path) = Self::pick_file(terminal, "Open Image — imgscii", filters, None) {
            if ia_source::is_supported_image(&path) {
                self.load_image(&path);
            } else {
                self.status = format!("unsupported file: {}", path.display());
            }
        }
    }

    fn save_text_dialog(&mut self, terminal: &mut DefaultTerminal) {
        let Some(art) = self.art.clone() else {
            self.status = "nothing to save yet".into();
            return;
        };
        let filters: &[(&str, &[&str])] = &[("Text", &["txt"])];
        if let Some(path) =
            Self::pick_file(terminal, "Save ASCII Art — imgscii", filters, Some("ascii-art.txt"))
        {
            match ia_export::save_text(&art, &path) {
                Ok(()) => self.status = format!("saved {}", path.display()),
                Err(e) => {
                    log::error!("{e}");
                    self.status = e.to_string();
                }
            }
        }
    }

    fn export_png_dialog(&mut self, terminal: &mut DefaultTerminal) {
        let Some(art) = self.art.clone() else {
            self.status = "nothing to export yet".into();
            return;
        };
        let filters: &[(&str, &[&str])] = &[("PNG", &["png"])];
        if let Some(path) =
            Self::pick_file(terminal, "Export as Image — imgscii", filters, Some("ascii-art.png"))
        {
            match ia_export::export_png(&art, &path, &self.export_style) {
                Ok(()) => self.status = format!("exported {}", path.display()),
                Err(e) => {
                    log::error!("{e:#}");
                    self.status = format!("{e:#}");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::worker::spawn_convert_worker;

    fn press(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn app_with_image() -> App {
        let (job_tx, outcome_rx) = spawn_convert_worker();
        let mut app = App::new(
            ConvertSettings::default(),
            ExportStyle::default(),
            job_tx,
            outcome_rx,
        );
        let mut image = PixelBuffer::new(10, 10);
        for px in image.data.chunks_exact_mut(4) {
            px.copy_from_slice(&[255, 255, 255, 255]);
        }
        app.image = Some(Arc::new(image));
        app.mark_dirty();
        app
    }

    fn wait_outcomes(app: &mut App) {
        for _ in 0..100 {
            app.apply_outcomes();
            if app.inflight.is_none() {
                return;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        panic!("worker never answered");
    }

    #[test]
    fn dispatch_and_apply_round_trip() {
        let mut app = app_with_image();
        app.dispatch_conversion();
        assert!(app.inflight.is_some());
        assert!(!app.dirty);
        wait_outcomes(&mut app);
        let art = app.art.as_ref().unwrap();
        assert_eq!((art.cols(), art.rows()), (10, 5));
    }

    #[test]
    fn stale_outcome_is_discarded() {
        let mut app = app_with_image();
        app.dispatch_conversion();
        // Settings change while the job is in flight: its result is stale.
        app.handle_event(&press(KeyCode::Char('i')));
        wait_outcomes(&mut app);
        assert!(app.art.is_none(), "stale artifact must be discarded");
        assert!(app.dirty, "superseding snapshot still pending");

        app.dispatch_conversion();
        wait_outcomes(&mut app);
        assert!(app.art.is_some());
    }

    #[test]
    fn no_dispatch_without_image() {
        let (job_tx, outcome_rx) = spawn_convert_worker();
        let mut app = App::new(
            ConvertSettings::default(),
            ExportStyle::default(),
            job_tx,
            outcome_rx,
        );
        app.handle_event(&press(KeyCode::Char('i')));
        app.dispatch_conversion();
        assert!(app.inflight.is_none());
    }

    #[test]
    fn single_flight_never_double_dispatches() {
        let mut app = app_with_image();
        app.dispatch_conversion();
        let first = app.inflight;
        app.handle_event(&press(KeyCode::Char(']')));
        app.dispatch_conversion(); // must be a no-op while in flight
        assert_eq!(app.inflight, first);
    }

    #[test]
    fn scale_keys_respect_bounds() {
        let mut app = app_with_image();
        for _ in 0..30 {
            app.handle_event(&press(KeyCode::Char('[')));
        }
        assert_eq!(app.settings.width_scale, SCALE_MIN);
        for _ in 0..30 {
            app.handle_event(&press(KeyCode::Char(']')));
        }
        assert_eq!(app.settings.width_scale, SCALE_MAX);
        assert!(app.settings.validate().is_ok());
    }

    #[test]
    fn configured_export_style_reaches_the_app() {
        let (job_tx, outcome_rx) = spawn_convert_worker();
        let style = ExportStyle::from_options(Some(24.0), Some("green"), None).unwrap();
        let app = App::new(ConvertSettings::default(), style, job_tx, outcome_rx);
        assert_eq!(app.export_style.font_px, 24.0);
        assert_eq!(app.export_style.fg, (0, 255, 0));
    }

    #[test]
    fn palette_keys_select_presets() {
        let mut app = app_with_image();
        app.handle_event(&press(KeyCode::Char('4')));
        assert_eq!(app.settings.palette_id(), Some(PaletteId::Blocks));
    }

    #[test]
    fn palette_editor_applies_valid_ramp() {
        let mut app = app_with_image();
        app.handle_event(&press(KeyCode::Char('C')));
        assert_eq!(app.state, UiState::PaletteEdit);

        // Wipe the buffer, type a short custom ramp.
        app.palette_edit_buf.clear();
        app.palette_edit_cursor = 0;
        for ch in " ox".chars() {
            app.handle_event(&press(KeyCode::Char(ch)));
        }
        app.handle_event(&press(KeyCode::Enter));
        assert_eq!(app.state, UiState::Running);
        assert_eq!(app.settings.palette, " ox");
    }

    #[test]
    fn palette_editor_rejects_single_char() {
        let mut app = app_with_image();
        app.handle_event(&press(KeyCode::Char('C')));
        app.palette_edit_buf = "#".into();
        app.palette_edit_cursor = 1;
        app.handle_event(&press(KeyCode::Enter));
        assert_eq!(app.state, UiState::PaletteEdit);
    }

    #[test]
    fn help_toggles_and_esc_quits() {
        let mut app = app_with_image();
        app.handle_event(&press(KeyCode::Char('?')));
        assert_eq!(app.state, UiState::Help);
        app.handle_event(&press(KeyCode::Esc));
        assert_eq!(app.state, UiState::Running);
        app.handle_event(&press(KeyCode::Esc));
        assert_eq!(app.state, UiState::Quitting);
    }
}
