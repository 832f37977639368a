use iced::widget::image::Handle;
use iced::widget::{
    button, column, container, pick_list, row, scrollable, text, text_input, Column, Row,
};
use iced::{Alignment, Element, Length, Task, Theme};
use rfd::FileDialog;

// Declare the application modules
mod picture;
mod state;

use state::contact::{Contact, ContactDraft};
use state::store::ContactStore;

/// The four menu pages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Page {
    AddContact,
    ViewContacts,
    DeleteContact,
    About,
}

/// One entry on the View Contacts page: the stored contact plus either its
/// decoded picture or a warning when the stored picture failed to decode.
#[derive(Debug, Clone)]
struct ContactEntry {
    contact: Contact,
    picture: Option<Handle>,
    picture_warning: Option<String>,
}

/// One row of the delete selection list
#[derive(Debug, Clone, PartialEq)]
struct DeleteChoice {
    id: i64,
    label: String,
}

impl std::fmt::Display for DeleteChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.label)
    }
}

/// Main application state
struct ContactBook {
    /// The contact database
    store: ContactStore,
    /// Which page is currently shown
    page: Page,
    /// Form input on the Add Contact page
    draft: ContactDraft,
    /// Filename of the chosen profile picture, shown next to the picker
    picture_name: Option<String>,
    /// Contacts shown on the View Contacts page
    entries: Vec<ContactEntry>,
    /// Selection list on the Delete Contact page
    choices: Vec<DeleteChoice>,
    selected: Option<DeleteChoice>,
    /// Status message to display to the user
    status: String,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    /// User picked a page from the menu
    PageSelected(Page),
    // Add Contact form fields
    NameChanged(String),
    PhoneChanged(String),
    EmailChanged(String),
    FirstMeetChanged(String),
    HowCloseChanged(String),
    ReasonChanged(String),
    NotesChanged(String),
    /// User clicked "Choose Picture…"
    PickPicture,
    /// User clicked "Save Contact"
    SaveContact,
    /// User picked a contact in the delete selection list
    ChoicePicked(DeleteChoice),
    /// User clicked "Delete Contact"
    DeleteSelected,
}

impl ContactBook {
    /// Create a new instance of the application
    fn new() -> (Self, Task<Message>) {
        // Initialize the database
        // If this fails, we panic because the app cannot function without its database
        let store = ContactStore::new()
            .expect("Failed to initialize database. Check permissions and disk space.");

        let contact_count = store.count().unwrap_or(0);
        println!("📇 Contact Book initialized with {} contacts", contact_count);

        let status = format!("Ready. {} contacts stored.", contact_count);

        (
            ContactBook {
                store,
                page: Page::AddContact,
                draft: ContactDraft::default(),
                picture_name: None,
                entries: Vec::new(),
                choices: Vec::new(),
                selected: None,
                status,
            },
            Task::none(),
        )
    }

    /// Handle application messages and update state.
    ///
    /// Every action runs to completion here, database I/O included, before
    /// the next message is processed. No background tasks.
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::PageSelected(page) => {
                self.page = page;
                self.selected = None;

                // Each page re-derives everything it shows from a fresh query
                match page {
                    Page::ViewContacts => self.refresh_entries(),
                    Page::DeleteContact => self.refresh_choices(),
                    Page::AddContact | Page::About => {}
                }
            }

            Message::NameChanged(value) => self.draft.name = value,
            Message::PhoneChanged(value) => self.draft.phone = value,
            Message::EmailChanged(value) => self.draft.email = value,
            Message::FirstMeetChanged(value) => self.draft.first_meet_place = value,
            Message::HowCloseChanged(value) => self.draft.how_close = value,
            Message::ReasonChanged(value) => self.draft.reason_close = value,
            Message::NotesChanged(value) => self.draft.notes = value,

            Message::PickPicture => {
                // Show the native file picker, filtered to supported formats
                let file = FileDialog::new()
                    .set_title("Select Profile Picture")
                    .add_filter("Images", &["jpg", "jpeg", "png"])
                    .pick_file();

                if let Some(path) = file {
                    // Encode right away so a bad file is reported before save
                    match image::open(&path) {
                        Ok(img) => match picture::encode_base64_png(&img) {
                            Ok(encoded) => {
                                self.draft.profile_picture = Some(encoded);
                                self.picture_name = path
                                    .file_name()
                                    .map(|name| name.to_string_lossy().to_string());
                            }
                            Err(e) => self.status = format!("⚠️  {}", e),
                        },
                        Err(e) => {
                            self.status = format!("⚠️  Could not read image: {}", e);
                        }
                    }
                }
            }

            Message::SaveContact => {
                // Name is the only required field
                if self.draft.name.trim().is_empty() {
                    self.status = "⚠️  Name is required.".to_string();
                    return Task::none();
                }

                match self.store.create(&self.draft) {
                    Ok(id) => {
                        self.status = format!("✅ Contact saved successfully! (ID: {})", id);
                        self.draft = ContactDraft::default();
                        self.picture_name = None;
                    }
                    Err(e) => {
                        eprintln!("❌ Save failed: {}", e);
                        self.status = format!("❌ {}", e);
                    }
                }
            }

            Message::ChoicePicked(choice) => {
                self.selected = Some(choice);
            }

            Message::DeleteSelected => {
                if let Some(choice) = self.selected.take() {
                    match self.store.delete_by_id(choice.id) {
                        Ok(()) => {
                            self.status = format!("✅ Deleted {}", choice.label);
                            // The connection is already closed; refreshing
                            // re-queries over a fresh one
                            self.refresh_choices();
                        }
                        Err(e) => {
                            eprintln!("❌ Delete failed: {}", e);
                            self.status = format!("❌ {}", e);
                        }
                    }
                }
            }
        }

        Task::none()
    }

    /// Reload the View Contacts entries from the database, decoding each
    /// stored profile picture. A picture that fails to decode becomes an
    /// inline warning on its contact; the rest of the listing still renders.
    fn refresh_entries(&mut self) {
        match self.store.list_all() {
            Ok(contacts) => {
                self.entries = contacts
                    .into_iter()
                    .map(|contact| {
                        let (picture, picture_warning) = match &contact.profile_picture {
                            Some(encoded) => match picture::decode_base64_image(encoded) {
                                Ok(bytes) => (Some(Handle::from_bytes(bytes)), None),
                                Err(e) => (None, Some(format!("⚠️  {}", e))),
                            },
                            // No picture stored, nothing to decode
                            None => (None, None),
                        };

                        ContactEntry {
                            contact,
                            picture,
                            picture_warning,
                        }
                    })
                    .collect();
            }
            Err(e) => {
                eprintln!("❌ Listing failed: {}", e);
                self.entries.clear();
                self.status = format!("❌ {}", e);
            }
        }
    }

    /// Reload the delete selection list from a fresh query
    fn refresh_choices(&mut self) {
        match self.store.list_all() {
            Ok(contacts) => {
                self.choices = contacts
                    .iter()
                    .map(|contact| DeleteChoice {
                        id: contact.id,
                        label: contact.label(),
                    })
                    .collect();
            }
            Err(e) => {
                eprintln!("❌ Listing failed: {}", e);
                self.choices.clear();
                self.status = format!("❌ {}", e);
            }
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let menu = column![
            text("Contact Book 📇").size(24),
            menu_button("Add Contact", Page::AddContact, self.page),
            menu_button("View Contacts", Page::ViewContacts, self.page),
            menu_button("Delete Contact", Page::DeleteContact, self.page),
            menu_button("About", Page::About, self.page),
        ]
        .spacing(10)
        .padding(20)
        .width(Length::Fixed(220.0));

        let page = match self.page {
            Page::AddContact => self.add_page(),
            Page::ViewContacts => self.view_page(),
            Page::DeleteContact => self.delete_page(),
            Page::About => about_page(),
        };

        let body = row![
            container(menu).height(Length::Fill),
            scrollable(container(page).width(Length::Fill).padding(20)).height(Length::Fill),
        ];

        column![
            container(body).height(Length::Fill),
            container(text(&self.status).size(14)).padding(10),
        ]
        .into()
    }

    /// The Add Contact form
    fn add_page(&self) -> Element<Message> {
        let picture_label = self
            .picture_name
            .as_deref()
            .unwrap_or("No picture selected");

        column![
            text("Add New Contact").size(28),
            text_input("Name", &self.draft.name)
                .on_input(Message::NameChanged)
                .padding(8),
            row![
                text_input("Phone", &self.draft.phone)
                    .on_input(Message::PhoneChanged)
                    .padding(8),
                text_input("Email", &self.draft.email)
                    .on_input(Message::EmailChanged)
                    .padding(8),
            ]
            .spacing(10),
            text_input("First Meeting Place", &self.draft.first_meet_place)
                .on_input(Message::FirstMeetChanged)
                .padding(8),
            text_input("How did you get close?", &self.draft.how_close)
                .on_input(Message::HowCloseChanged)
                .padding(8),
            text_input("Reason for getting close", &self.draft.reason_close)
                .on_input(Message::ReasonChanged)
                .padding(8),
            text_input("Notes", &self.draft.notes)
                .on_input(Message::NotesChanged)
                .padding(8),
            row![
                button("Choose Picture…").on_press(Message::PickPicture),
                text(picture_label).size(14),
            ]
            .spacing(10)
            .align_y(Alignment::Center),
            button("Save Contact")
                .on_press(Message::SaveContact)
                .padding(10),
        ]
        .spacing(12)
        .into()
    }

    /// The View Contacts listing
    fn view_page(&self) -> Element<Message> {
        let mut list = Column::new().spacing(16);

        if self.entries.is_empty() {
            list = list.push(text("No contacts found").size(16));
        }

        for entry in &self.entries {
            list = list.push(contact_card(entry));
        }

        column![text("Your Contacts").size(28), list]
            .spacing(12)
            .into()
    }

    /// The Delete Contact page
    fn delete_page(&self) -> Element<Message> {
        column![
            text("Delete Contact").size(28),
            pick_list(
                self.choices.clone(),
                self.selected.clone(),
                Message::ChoicePicked,
            )
            .placeholder("Select a contact to delete"),
            button("Delete Contact")
                .on_press_maybe(self.selected.is_some().then_some(Message::DeleteSelected))
                .padding(10),
        ]
        .spacing(12)
        .into()
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

/// A sidebar menu button, highlighted when its page is active
fn menu_button(label: &str, page: Page, current: Page) -> Element<'_, Message> {
    let style = if page == current {
        button::primary
    } else {
        button::secondary
    };

    button(text(label))
        .style(style)
        .on_press(Message::PageSelected(page))
        .width(Length::Fill)
        .padding(8)
        .into()
}

/// One contact on the View Contacts page: picture (when present and valid)
/// next to the stored details
fn contact_card(entry: &ContactEntry) -> Element<'_, Message> {
    let contact = &entry.contact;

    let mut details = Column::new().spacing(4).push(
        text(format!(
            "{} — {}",
            contact.name,
            contact.phone.as_deref().unwrap_or("no phone")
        ))
        .size(20),
    );

    if let Some(email) = &contact.email {
        details = details.push(text(format!("Email: {}", email)).size(14));
    }
    if let Some(place) = &contact.first_meet_place {
        details = details.push(text(format!("First Met At: {}", place)).size(14));
    }
    if let Some(how) = &contact.how_close {
        details = details.push(text(format!("How You Got Close: {}", how)).size(14));
    }
    if let Some(reason) = &contact.reason_close {
        details = details.push(text(format!("Reason for Closeness: {}", reason)).size(14));
    }
    if let Some(notes) = &contact.notes {
        details = details.push(text(format!("Notes: {}", notes)).size(14));
    }
    if let Some(warning) = &entry.picture_warning {
        details = details.push(text(warning.clone()).size(14));
    }

    let mut card = Row::new().spacing(16);
    if let Some(handle) = &entry.picture {
        card = card.push(
            iced::widget::image(handle.clone()).width(Length::Fixed(120.0)),
        );
    }
    card = card.push(details);

    container(card).padding(12).width(Length::Fill).into()
}

/// The About page
fn about_page() -> Element<'static, Message> {
    column![
        text("About").size(28),
        text("Contact Book — a simple contact relationship manager.").size(16),
        text("Features:").size(16),
        text("  • Store contact details").size(14),
        text("  • Track how each relationship started").size(14),
        text("  • Add profile pictures").size(14),
        text("  • Delete unwanted contacts").size(14),
        text("  • Persistent SQLite storage").size(14),
    ]
    .spacing(8)
    .into()
}

fn main() -> iced::Result {
    iced::application(
        "Contact Book",
        ContactBook::update,
        ContactBook::view,
    )
    .theme(ContactBook::theme)
    .centered()
    .run_with(ContactBook::new)
}
