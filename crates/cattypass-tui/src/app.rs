//! Application state management.

use anyhow::{Context, Result};
use cattypass_core::{
    generate_password, Config, CredentialRecord, FileDownloader, FileStorage, PasswordVault,
    VaultError, NO_VALID_PASSWORDS,
};
use tokio::runtime::Runtime;

/// Application state.
#[derive(Debug, Clone, PartialEq)]
pub enum AppState {
    /// Application is running.
    Running,
    /// Application should quit.
    Quit,
}

/// Top-level pages of the popup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Generate,
    Manage,
    Settings,
    Credits,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Generate, Tab::Manage, Tab::Settings, Tab::Credits];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Generate => "Generate",
            Tab::Manage => "Manage",
            Tab::Settings => "Settings",
            Tab::Credits => "Credits",
        }
    }

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|t| *t == self).unwrap_or(0)
    }

    pub fn next(self) -> Tab {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn previous(self) -> Tab {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Input mode for the application.
#[derive(Debug, Clone, PartialEq)]
pub enum InputMode {
    /// Normal navigation mode.
    Normal,
    /// Typing into the focused form field.
    Editing,
    /// Search mode.
    Search,
    /// Typing the path of a CSV file to import.
    ImportPath,
}

/// A text field of the generate form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Site,
    Password,
    Username,
    Note,
}

/// Form on the Generate page.
#[derive(Debug, Clone)]
pub struct GenerateForm {
    pub site: String,
    pub password: String,
    pub username: String,
    pub note: String,
    pub focus: FormField,
}

impl GenerateForm {
    const FIELDS: [FormField; 4] = [
        FormField::Site,
        FormField::Password,
        FormField::Username,
        FormField::Note,
    ];

    fn new() -> Self {
        Self {
            site: String::new(),
            password: String::new(),
            username: String::new(),
            note: String::new(),
            focus: FormField::Site,
        }
    }

    pub fn field_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::Site => &mut self.site,
            FormField::Password => &mut self.password,
            FormField::Username => &mut self.username,
            FormField::Note => &mut self.note,
        }
    }

    pub fn focus_next(&mut self) {
        self.focus = cycle(&Self::FIELDS, self.focus, 1);
    }

    pub fn focus_previous(&mut self) {
        self.focus = cycle(&Self::FIELDS, self.focus, Self::FIELDS.len() - 1);
    }
}

/// A text field of the edit modal. The site name is fixed while editing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditField {
    Username,
    Password,
    Note,
}

/// Form shown in the edit modal.
#[derive(Debug, Clone)]
pub struct EditForm {
    pub site: String,
    pub username: String,
    pub password: String,
    pub note: String,
    pub focus: EditField,
    /// Validation message shown inside the modal.
    pub error: Option<String>,
}

impl EditForm {
    const FIELDS: [EditField; 3] = [EditField::Username, EditField::Password, EditField::Note];

    fn from_record(site: &str, record: &CredentialRecord) -> Self {
        Self {
            site: site.to_string(),
            username: record.username.clone(),
            password: record.password.clone(),
            note: record.note.clone(),
            focus: EditField::Username,
            error: None,
        }
    }

    pub fn field_mut(&mut self, field: EditField) -> &mut String {
        match field {
            EditField::Username => &mut self.username,
            EditField::Password => &mut self.password,
            EditField::Note => &mut self.note,
        }
    }

    pub fn focus_next(&mut self) {
        self.focus = cycle(&Self::FIELDS, self.focus, 1);
    }

    pub fn focus_previous(&mut self) {
        self.focus = cycle(&Self::FIELDS, self.focus, Self::FIELDS.len() - 1);
    }
}

fn cycle<F: Copy + PartialEq>(fields: &[F], current: F, step: usize) -> F {
    let index = fields.iter().position(|f| *f == current).unwrap_or(0);
    fields[(index + step) % fields.len()]
}

/// Modal drawn over the current page.
#[derive(Debug, Clone)]
pub enum Overlay {
    None,
    /// Informational message, dismissed with Enter or Esc.
    Message(String),
    /// Edit a saved record.
    Edit(EditForm),
    /// Ask before deleting the named site.
    ConfirmDelete(String),
}

/// A search result.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Index into the loaded records.
    pub index: usize,
    /// Site name for display.
    pub site: String,
    /// Match score for sorting.
    pub score: i64,
}

/// Main application model.
pub struct App {
    /// Current application state.
    pub state: AppState,
    /// Current input mode.
    pub input_mode: InputMode,
    /// Active page.
    pub tab: Tab,
    /// Modal currently shown.
    pub overlay: Overlay,
    /// Loaded configuration.
    pub config: Config,
    vault: PasswordVault<FileStorage>,
    runtime: Runtime,

    /// Generate page form.
    pub form: GenerateForm,

    // Manage page state
    /// Records as last loaded from storage.
    pub records: Vec<(String, CredentialRecord)>,
    /// Index of the selected record.
    pub selected_index: usize,
    /// Whether passwords are shown in clear text.
    pub show_passwords: bool,

    // Search state
    /// Search query.
    pub search_query: String,
    /// Search results.
    pub search_results: Vec<SearchResult>,
    /// Selected search result index.
    pub search_selected_index: usize,

    /// Path typed for CSV import.
    pub import_path: String,
}

impl App {
    /// Create a new application instance over the configured storage file.
    pub fn new(config: Config) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("Failed to start async runtime")?;

        Ok(Self {
            state: AppState::Running,
            input_mode: InputMode::Normal,
            tab: Tab::Generate,
            overlay: Overlay::None,
            vault: PasswordVault::new(FileStorage::new(&config.storage_path)),
            runtime,
            form: GenerateForm::new(),
            records: Vec::new(),
            selected_index: 0,
            show_passwords: config.show_passwords,
            search_query: String::new(),
            search_results: Vec::new(),
            search_selected_index: 0,
            import_path: String::new(),
            config,
        })
    }

    /// Switch to `tab`, reloading the list when entering Manage.
    pub fn set_active_tab(&mut self, tab: Tab) {
        self.tab = tab;
        self.input_mode = InputMode::Normal;
        if tab == Tab::Manage {
            self.load_passwords();
        }
    }

    pub fn show_message(&mut self, message: impl Into<String>) {
        self.overlay = Overlay::Message(message.into());
    }

    pub fn close_overlay(&mut self) {
        self.overlay = Overlay::None;
    }

    /// Fill the password field with a new random password.
    pub fn generate(&mut self) {
        self.form.password = generate_password(self.config.password_length);
    }

    /// Save the Generate form as a record.
    pub fn save_generated(&mut self) {
        let site = self.form.site.trim().to_string();
        let record = CredentialRecord::new(
            self.form.username.as_str(),
            self.form.password.as_str(),
            self.form.note.as_str(),
        );

        match self.runtime.block_on(self.vault.upsert(&site, record)) {
            Ok(()) => {
                self.show_message(format!("Password for \"{site}\" saved!"));
                self.load_passwords();
            }
            Err(e) => self.show_error(e),
        }
    }

    /// Reload the record list from storage.
    pub fn load_passwords(&mut self) {
        match self.runtime.block_on(self.vault.list()) {
            Ok(listing) => {
                self.records = listing.into_records();
                if self.selected_index >= self.records.len() {
                    self.selected_index = self.records.len().saturating_sub(1);
                }
            }
            Err(e) => self.show_error(e),
        }
    }

    pub fn selected_record(&self) -> Option<&(String, CredentialRecord)> {
        self.records.get(self.selected_index)
    }

    /// Move selection up in the record list.
    pub fn move_up(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }

    /// Move selection down in the record list.
    pub fn move_down(&mut self) {
        if self.selected_index + 1 < self.records.len() {
            self.selected_index += 1;
        }
    }

    /// Open the edit modal for the selected record.
    pub fn open_edit(&mut self) {
        if let Some((site, record)) = self.selected_record() {
            self.overlay = Overlay::Edit(EditForm::from_record(site, record));
        }
    }

    /// Save the edit modal. On a validation error the modal stays open.
    pub fn save_edit(&mut self) {
        let Overlay::Edit(form) = &self.overlay else {
            return;
        };
        let site = form.site.clone();
        let record = CredentialRecord::new(
            form.username.as_str(),
            form.password.as_str(),
            form.note.as_str(),
        );

        match self.runtime.block_on(self.vault.edit(&site, record)) {
            Ok(()) => {
                self.close_overlay();
                self.load_passwords();
            }
            Err(VaultError::Validation(message)) => {
                if let Overlay::Edit(form) = &mut self.overlay {
                    form.error = Some(message);
                }
            }
            Err(e) => self.show_error(e),
        }
    }

    /// Ask for confirmation before deleting the selected record.
    pub fn request_delete(&mut self) {
        if let Some((site, _)) = self.selected_record() {
            self.overlay = Overlay::ConfirmDelete(site.clone());
        }
    }

    /// Delete the site named in the confirmation modal.
    pub fn confirm_delete(&mut self) {
        let Overlay::ConfirmDelete(site) = &self.overlay else {
            return;
        };
        let site = site.clone();
        self.close_overlay();

        match self.runtime.block_on(self.vault.delete(&site)) {
            Ok(_) => self.load_passwords(),
            Err(e) => self.show_error(e),
        }
    }

    /// Export all records into the configured export directory.
    pub fn export(&mut self) {
        let downloader = FileDownloader::new(&self.config.export_dir);
        match self.runtime.block_on(self.vault.export(&downloader)) {
            Ok(path) => self.show_message(format!("Exported passwords to {}", path.display())),
            Err(e) => self.show_error(e),
        }
    }

    /// Start typing an import path.
    pub fn start_import(&mut self) {
        self.input_mode = InputMode::ImportPath;
        self.import_path.clear();
    }

    /// Import the CSV file at the typed path.
    pub fn import(&mut self) {
        self.input_mode = InputMode::Normal;
        let path = self.import_path.trim().to_string();
        if path.is_empty() {
            return;
        }

        let vault = &self.vault;
        let result = self.runtime.block_on(async {
            let bytes = tokio::fs::read(&path)
                .await
                .map_err(|e| VaultError::Parse(format!("{path}: {e}")))?;
            vault.import_csv(&bytes).await
        });

        match result {
            Ok(count) => {
                tracing::debug!(count, "Imported passwords from {}", path);
                self.show_message("Imported passwords successfully!");
                self.load_passwords();
            }
            Err(VaultError::Parse(message)) if message == NO_VALID_PASSWORDS => {
                self.show_message(NO_VALID_PASSWORDS);
            }
            Err(VaultError::Parse(message)) => {
                tracing::debug!("Import failed: {}", message);
                self.show_message("Failed to parse CSV file.");
            }
            Err(e) => self.show_error(e),
        }
    }

    /// Show `error` in a modal. Logging stays at debug level while the
    /// terminal is in raw mode.
    fn show_error(&mut self, error: VaultError) {
        tracing::debug!("{}", error);
        self.show_message(error.to_string());
    }

    /// Start search mode.
    pub fn start_search(&mut self) {
        self.input_mode = InputMode::Search;
        self.search_query.clear();
        self.search_results.clear();
        self.search_selected_index = 0;
    }

    /// Exit search mode.
    pub fn exit_search(&mut self) {
        self.input_mode = InputMode::Normal;
        self.search_query.clear();
        self.search_results.clear();
    }

    /// Perform fuzzy search over the loaded records.
    pub fn perform_search(&mut self) {
        use fuzzy_matcher::skim::SkimMatcherV2;
        use fuzzy_matcher::FuzzyMatcher;

        self.search_results.clear();

        if self.search_query.trim().is_empty() {
            return;
        }

        let matcher = SkimMatcherV2::default();

        let mut scored: Vec<_> = self
            .records
            .iter()
            .enumerate()
            .filter_map(|(index, (site, record))| {
                let search_text = format!("{} {} {}", site, record.username, record.note);
                matcher
                    .fuzzy_match(&search_text, &self.search_query)
                    .map(|score| SearchResult {
                        index,
                        site: site.clone(),
                        score,
                    })
            })
            .collect();

        scored.sort_by(|a, b| b.score.cmp(&a.score));
        self.search_results = scored.into_iter().take(10).collect();
        self.search_selected_index = 0;
    }

    /// Select a search result.
    pub fn select_search_result(&mut self) {
        if let Some(result) = self.search_results.get(self.search_selected_index) {
            self.selected_index = result.index;
        }
        self.exit_search();
    }
}
