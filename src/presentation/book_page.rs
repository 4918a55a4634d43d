//! Book page presenter.
//!
//! Everything the page script decides lives here as plain state
//! transitions; the page only fetches what `load_plan` asks for, renders
//! `view_model`, and feeds responses back in. `BookPageState` is passed
//! explicitly from one transition to the next.

use crate::domain::models::{Author, Book, BookChanges};

pub const TOAST_DURATION_MS: u32 = 2000;

pub const ADD_TO_LIBRARY: &str = "Add to Library";
pub const REMOVE_FROM_LIBRARY: &str = "Remove from Library";
pub const LIBRARY_FAILURE: &str = "Could not add book. Please try again.";

/// A transient notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub message: &'static str,
    pub duration_ms: u32,
}

impl Toast {
    fn new(message: &'static str) -> Self {
        Self {
            message,
            duration_ms: TOAST_DURATION_MS,
        }
    }
}

/// A resource the page has to load before it can render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fetch {
    Book { path: String },
    Authors { path: String },
    LibraryMembership { path: String },
}

pub fn load_plan(book_id: Option<i64>, user_id: Option<i64>) -> Vec<Fetch> {
    let mut plan = Vec::with_capacity(3);
    if let Some(book_id) = book_id {
        plan.push(Fetch::Book {
            path: format!("/books/{}", book_id),
        });
    }
    plan.push(Fetch::Authors {
        path: "/authors".to_string(),
    });
    if let (Some(book_id), Some(user_id)) = (book_id, user_id) {
        plan.push(Fetch::LibraryMembership {
            path: format!("/users/{}/books/{}", user_id, book_id),
        });
    }
    plan
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    View,
    Edit,
    /// Edit without a stored book behind it.
    NewBook,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Post,
    Delete,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryRequest {
    pub method: HttpMethod,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BookPageState {
    pub mode: Mode,
    pub book: Option<Book>,
    pub authors: Vec<Author>,
    pub author: Option<Author>,
    pub user_id: Option<i64>,
    pub in_library: bool,
}

/// What the page shows in view mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewModel {
    pub title: String,
    pub author_name: String,
    pub author_href: String,
    pub genre: String,
    pub description: String,
    pub cover_url: String,
    /// `None` hides the library button (anonymous visitor).
    pub library_label: Option<&'static str>,
}

/// The edit form fields as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditForm {
    pub title: String,
    pub author_id: Option<i64>,
    pub genre: String,
    pub description: String,
    pub cover_url: String,
}

fn find_author(authors: &[Author], author_id: i64) -> Option<Author> {
    authors.iter().find(|a| a.id == author_id).cloned()
}

impl BookPageState {
    /// State for an existing book once every fetch in the plan has returned.
    pub fn loaded(book: Book, authors: Vec<Author>, user_id: Option<i64>, in_library: bool) -> Self {
        let author = find_author(&authors, book.author_id);
        Self {
            mode: Mode::View,
            book: Some(book),
            authors,
            author,
            user_id,
            in_library: user_id.is_some() && in_library,
        }
    }

    pub fn new_book(authors: Vec<Author>, user_id: Option<i64>) -> Self {
        Self {
            mode: Mode::NewBook,
            book: None,
            authors,
            author: None,
            user_id,
            in_library: false,
        }
    }

    pub fn library_label(&self) -> Option<&'static str> {
        self.user_id.map(|_| {
            if self.in_library {
                REMOVE_FROM_LIBRARY
            } else {
                ADD_TO_LIBRARY
            }
        })
    }

    pub fn view_model(&self) -> Option<ViewModel> {
        let book = self.book.as_ref()?;
        let author_name = self
            .author
            .as_ref()
            .map(Author::display_name)
            .unwrap_or_default();
        Some(ViewModel {
            title: book.title.clone(),
            author_name,
            author_href: format!("author.html?id={}", book.author_id),
            genre: book.genre.clone(),
            description: book.description.clone(),
            cover_url: book.cover_url.clone(),
            library_label: self.library_label(),
        })
    }

    /// View → Edit: the form is refilled from the current book.
    pub fn edit(&mut self) -> EditForm {
        if self.mode == Mode::View {
            self.mode = Mode::Edit;
        }
        match &self.book {
            Some(book) => EditForm {
                title: book.title.clone(),
                author_id: Some(book.author_id),
                genre: book.genre.clone(),
                description: book.description.clone(),
                cover_url: book.cover_url.clone(),
            },
            None => EditForm::default(),
        }
    }

    /// Validates the form in display order. The first failing field becomes
    /// a toast; nothing is submitted in that case.
    pub fn save(&self, form: &EditForm) -> Result<BookChanges, Toast> {
        let title = form.title.trim();
        let genre = form.genre.trim();
        let description = form.description.trim();
        let cover_url = form.cover_url.trim();

        if title.is_empty() {
            return Err(Toast::new("Please enter a title"));
        }
        let author_id = match form.author_id {
            Some(id) if id > 0 => id,
            _ => return Err(Toast::new("Please add an author first")),
        };
        if genre.is_empty() {
            return Err(Toast::new("Please enter a genre"));
        }
        if description.is_empty() {
            return Err(Toast::new("Please enter a summary"));
        }
        if cover_url.is_empty() {
            return Err(Toast::new("Please enter an image url"));
        }

        Ok(BookChanges {
            title: Some(title.to_string()),
            genre: Some(genre.to_string()),
            description: Some(description.to_string()),
            cover_url: Some(cover_url.to_string()),
            author_id: Some(author_id),
        })
    }

    /// Edit → View with the book the server sent back.
    pub fn saved(&mut self, book: Book) {
        self.author = find_author(&self.authors, book.author_id);
        self.book = Some(book);
        self.mode = Mode::View;
    }

    /// The request the library button issues, decided by its current label.
    pub fn library_request(&self) -> Option<LibraryRequest> {
        let user_id = self.user_id?;
        let book = self.book.as_ref()?;
        let method = if self.in_library {
            HttpMethod::Delete
        } else {
            HttpMethod::Post
        };
        Some(LibraryRequest {
            method,
            path: format!("/users/{}/books/{}", user_id, book.id),
        })
    }

    /// Flips the label on success. On failure the label stays and a toast is
    /// returned.
    pub fn library_result(&mut self, succeeded: bool) -> Option<Toast> {
        if succeeded {
            self.in_library = !self.in_library;
            None
        } else {
            Some(Toast::new(LIBRARY_FAILURE))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn authors() -> Vec<Author> {
        vec![
            Author {
                id: 1,
                first_name: "Frank".to_string(),
                last_name: "Herbert".to_string(),
                biography: None,
                portrait_url: None,
            },
            Author {
                id: 2,
                first_name: "Iain".to_string(),
                last_name: "Banks".to_string(),
                biography: None,
                portrait_url: None,
            },
        ]
    }

    fn dune() -> Book {
        Book {
            id: 10,
            title: "Dune".to_string(),
            genre: "Science Fiction".to_string(),
            description: "Spice must flow.".to_string(),
            cover_url: "https://example.com/dune.jpg".to_string(),
            author_id: 1,
        }
    }

    fn complete_form() -> EditForm {
        EditForm {
            title: "Excession".to_string(),
            author_id: Some(2),
            genre: "Science Fiction".to_string(),
            description: "An Outside Context Problem.".to_string(),
            cover_url: "https://example.com/excession.jpg".to_string(),
        }
    }

    #[test]
    fn test_load_plan_for_signed_in_visitor() {
        assert_eq!(
            load_plan(Some(10), Some(3)),
            vec![
                Fetch::Book {
                    path: "/books/10".to_string()
                },
                Fetch::Authors {
                    path: "/authors".to_string()
                },
                Fetch::LibraryMembership {
                    path: "/users/3/books/10".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_load_plan_without_book_only_loads_authors() {
        assert_eq!(
            load_plan(None, Some(3)),
            vec![Fetch::Authors {
                path: "/authors".to_string()
            }]
        );
    }

    #[test]
    fn test_loaded_resolves_author_and_renders() {
        let state = BookPageState::loaded(dune(), authors(), None, false);
        let view = state.view_model().unwrap();

        assert_eq!(state.mode, Mode::View);
        assert_eq!(view.author_name, "Frank Herbert");
        assert_eq!(view.author_href, "author.html?id=1");
        assert_eq!(view.library_label, None);
    }

    #[test]
    fn test_library_label_follows_membership() {
        let state = BookPageState::loaded(dune(), authors(), Some(3), true);
        assert_eq!(state.library_label(), Some(REMOVE_FROM_LIBRARY));

        let state = BookPageState::loaded(dune(), authors(), Some(3), false);
        assert_eq!(state.library_label(), Some(ADD_TO_LIBRARY));
    }

    #[test]
    fn test_edit_repopulates_form() {
        let mut state = BookPageState::loaded(dune(), authors(), None, false);
        let form = state.edit();

        assert_eq!(state.mode, Mode::Edit);
        assert_eq!(form.title, "Dune");
        assert_eq!(form.author_id, Some(1));
    }

    #[test]
    fn test_save_reports_first_missing_field_in_order() {
        let state = BookPageState::loaded(dune(), authors(), None, false);

        let cases: [(fn(&mut EditForm), &str); 5] = [
            (|f| f.title = " ".to_string(), "Please enter a title"),
            (|f| f.author_id = None, "Please add an author first"),
            (|f| f.genre.clear(), "Please enter a genre"),
            (|f| f.description.clear(), "Please enter a summary"),
            (|f| f.cover_url.clear(), "Please enter an image url"),
        ];
        for (break_form, expected) in cases {
            let mut form = complete_form();
            break_form(&mut form);
            let toast = state.save(&form).unwrap_err();
            assert_eq!(toast.message, expected);
            assert_eq!(toast.duration_ms, TOAST_DURATION_MS);
        }

        // Title wins over everything else
        let toast = state.save(&EditForm::default()).unwrap_err();
        assert_eq!(toast.message, "Please enter a title");
    }

    #[test]
    fn test_save_trims_and_saved_returns_to_view_with_new_author() {
        let mut state = BookPageState::loaded(dune(), authors(), None, false);
        state.edit();
        let mut form = complete_form();
        form.title = "  Excession ".to_string();

        let changes = state.save(&form).unwrap();
        assert_eq!(changes.title.as_deref(), Some("Excession"));

        let mut updated = dune();
        updated.title = "Excession".to_string();
        updated.author_id = 2;
        state.saved(updated);

        assert_eq!(state.mode, Mode::View);
        assert_eq!(state.view_model().unwrap().author_name, "Iain Banks");
    }

    #[test]
    fn test_new_book_starts_in_edit_with_empty_form() {
        let mut state = BookPageState::new_book(authors(), None);
        assert_eq!(state.mode, Mode::NewBook);
        assert!(state.view_model().is_none());
        assert_eq!(state.edit(), EditForm::default());
        assert_eq!(state.mode, Mode::NewBook);
    }

    #[test]
    fn test_library_toggle_flips_on_success_only() {
        let mut state = BookPageState::loaded(dune(), authors(), Some(3), false);

        let request = state.library_request().unwrap();
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.path, "/users/3/books/10");

        let toast = state.library_result(false).unwrap();
        assert_eq!(toast.message, LIBRARY_FAILURE);
        assert_eq!(state.library_label(), Some(ADD_TO_LIBRARY));

        assert!(state.library_result(true).is_none());
        assert_eq!(state.library_label(), Some(REMOVE_FROM_LIBRARY));
        assert_eq!(state.library_request().unwrap().method, HttpMethod::Delete);
    }

    #[test]
    fn test_anonymous_visitor_has_no_library_request() {
        let state = BookPageState::loaded(dune(), authors(), None, true);
        assert!(state.library_request().is_none());
        assert!(!state.in_library);
    }
}
