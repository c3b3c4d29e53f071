//! Top-level view selection (catalog / magazine profile / booking).
//!
//! [`Navigator`] owns which view is active, the selected magazine, the
//! catalog filter, and the booking machine while a booking is open. Booking
//! completions and cancellations are reported to a [`BookingListener`]
//! exactly once and always return the visitor to the catalog.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::booking::{
    BookingData, BookingEvent, BookingMachine, BookingOutcome, BookingStep, StepProgress,
};
use crate::catalog::{Catalog, Magazine};
use crate::error::CoreError;
use crate::filter::MagazineFilter;
use crate::types::Price;

// ---------------------------------------------------------------------------
// Listener
// ---------------------------------------------------------------------------

/// Receives the terminal results of the booking flow.
pub trait BookingListener: Send + Sync {
    /// Called once per successful submission with the completed snapshot.
    fn on_booking_complete(&self, snapshot: &BookingData);

    /// Called when the visitor abandons the flow from the first step.
    fn on_cancel(&self);
}

/// Listener that ignores every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopListener;

impl BookingListener for NoopListener {
    fn on_booking_complete(&self, _snapshot: &BookingData) {}

    fn on_cancel(&self) {}
}

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    Catalog,
    Profile,
    Booking,
}

/// Everything a presentation layer needs to draw the booking form.
#[derive(Debug, Clone, Serialize)]
pub struct BookingScreen {
    pub step: BookingStep,
    pub steps: Vec<StepProgress>,
    pub data: BookingData,
    pub total_cost: Price,
    pub available_magazines: Vec<Arc<Magazine>>,
    pub can_advance: bool,
    pub can_go_back: bool,
    pub can_cancel: bool,
    pub can_submit: bool,
}

impl BookingScreen {
    fn from_machine(machine: &BookingMachine) -> Self {
        Self {
            step: machine.step(),
            steps: machine.progress(),
            data: machine.data().clone(),
            total_cost: machine.total_cost(),
            available_magazines: machine.available_magazines(),
            can_advance: machine.can_advance(),
            can_go_back: machine.can_go_back(),
            can_cancel: machine.can_cancel(),
            can_submit: machine.can_submit(),
        }
    }
}

/// Render model for the active view.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum Screen {
    Catalog {
        magazines: Vec<Arc<Magazine>>,
        categories: Vec<String>,
        search_term: String,
        selected_category: Option<String>,
    },
    Profile {
        magazine: Arc<Magazine>,
    },
    Booking(BookingScreen),
}

// ---------------------------------------------------------------------------
// Navigator
// ---------------------------------------------------------------------------

pub struct Navigator {
    catalog: Arc<Catalog>,
    listener: Arc<dyn BookingListener>,
    view: View,
    selected_magazine: Option<Arc<Magazine>>,
    filter: MagazineFilter,
    booking: Option<BookingMachine>,
}

impl Navigator {
    pub fn new(catalog: Arc<Catalog>, listener: Arc<dyn BookingListener>) -> Self {
        Self {
            catalog,
            listener,
            view: View::Catalog,
            selected_magazine: None,
            filter: MagazineFilter::default(),
            booking: None,
        }
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn selected_magazine(&self) -> Option<&Arc<Magazine>> {
        self.selected_magazine.as_ref()
    }

    pub fn booking(&self) -> Option<&BookingMachine> {
        self.booking.as_ref()
    }

    pub fn filter(&self) -> &MagazineFilter {
        &self.filter
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    // -- catalog view --------------------------------------------------------

    pub fn go_catalog(&mut self) {
        self.view = View::Catalog;
        self.selected_magazine = None;
        self.booking = None;
    }

    pub fn set_search(&mut self, search_term: impl Into<String>) {
        self.filter.search_term = search_term.into();
    }

    /// `None` selects "All".
    pub fn select_category(&mut self, category: Option<String>) {
        self.filter.select_category(category);
    }

    pub fn visible_magazines(&self) -> Vec<Arc<Magazine>> {
        self.filter.apply(&self.catalog)
    }

    // -- profile view --------------------------------------------------------

    /// Open a magazine profile. An unknown id falls back to the catalog.
    pub fn go_profile(&mut self, magazine_id: &str) -> View {
        match self.catalog.find_magazine_by_id(magazine_id) {
            Some(magazine) => {
                self.selected_magazine = Some(Arc::clone(magazine));
                self.booking = None;
                self.view = View::Profile;
            }
            None => {
                tracing::debug!(magazine_id, "Profile requested for unknown magazine");
                self.go_catalog();
            }
        }
        self.view
    }

    // -- booking view --------------------------------------------------------

    /// Open the booking flow, seeded with `magazine` when one is given.
    pub fn go_booking(&mut self, magazine: Option<Arc<Magazine>>) {
        let machine = match magazine {
            Some(magazine) => {
                self.selected_magazine = Some(Arc::clone(&magazine));
                BookingMachine::seeded(Arc::clone(&self.catalog), magazine)
            }
            None => BookingMachine::new(Arc::clone(&self.catalog)),
        };
        self.booking = Some(machine);
        self.view = View::Booking;
    }

    /// [`go_booking`](Self::go_booking) by magazine id. An unknown id falls
    /// back to the catalog.
    pub fn go_booking_for(&mut self, magazine_id: Option<&str>) -> View {
        match magazine_id {
            None => self.go_booking(None),
            Some(id) => match self.catalog.find_magazine_by_id(id) {
                Some(magazine) => {
                    let magazine = Arc::clone(magazine);
                    self.go_booking(Some(magazine));
                }
                None => {
                    tracing::debug!(magazine_id = id, "Booking requested for unknown magazine");
                    self.go_catalog();
                }
            },
        }
        self.view
    }

    /// Forward an event to the open booking. Completion and cancellation are
    /// reported to the listener, then the catalog view is restored.
    pub fn dispatch(&mut self, event: BookingEvent) -> Result<Option<BookingOutcome>, CoreError> {
        let machine = match (self.view, self.booking.as_mut()) {
            (View::Booking, Some(machine)) => machine,
            _ => return Err(CoreError::guard("No booking is in progress")),
        };

        let outcome = machine.apply(event)?;
        match &outcome {
            Some(BookingOutcome::Completed(snapshot)) => {
                self.listener.on_booking_complete(snapshot);
                self.go_catalog();
            }
            Some(BookingOutcome::Cancelled) => {
                self.listener.on_cancel();
                self.go_catalog();
            }
            None => {}
        }
        Ok(outcome)
    }

    // -- rendering -----------------------------------------------------------

    pub fn screen(&self) -> Screen {
        match (self.view, &self.selected_magazine, &self.booking) {
            (View::Profile, Some(magazine), _) => Screen::Profile {
                magazine: Arc::clone(magazine),
            },
            (View::Booking, _, Some(machine)) => {
                Screen::Booking(BookingScreen::from_machine(machine))
            }
            _ => Screen::Catalog {
                magazines: self.visible_magazines(),
                categories: self.catalog.all_categories().to_vec(),
                search_term: self.filter.search_term.clone(),
                selected_category: self.filter.category.clone(),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
