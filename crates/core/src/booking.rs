//! Ad booking workflow: steps, booking data, and the transition rules.
//!
//! The workflow has four strictly sequential steps (Category, Magazine &
//! Package, Brand Details, Review). Every transition either applies fully or
//! is rejected with [`CoreError::GuardViolation`], in which case the machine
//! is left exactly as it was. Guards are checked before any field is written.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::catalog::{AdPackage, Catalog, Magazine};
use crate::error::CoreError;
use crate::types::Price;

// ---------------------------------------------------------------------------
// Steps
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStep {
    Category,
    MagazinePackage,
    BrandDetails,
    Review,
}

/// Minimum step number (1-based).
pub const MIN_STEP: u8 = 1;

/// Maximum step number (1-based).
pub const MAX_STEP: u8 = 4;

impl BookingStep {
    pub const ALL: [BookingStep; 4] = [
        Self::Category,
        Self::MagazinePackage,
        Self::BrandDetails,
        Self::Review,
    ];

    /// Convert a 1-based step number to a `BookingStep`.
    pub fn from_number(n: u8) -> Result<Self, CoreError> {
        match n {
            1 => Ok(Self::Category),
            2 => Ok(Self::MagazinePackage),
            3 => Ok(Self::BrandDetails),
            4 => Ok(Self::Review),
            _ => Err(CoreError::Validation(format!(
                "Invalid step number {n}. Must be between {MIN_STEP} and {MAX_STEP}"
            ))),
        }
    }

    /// Convert to a 1-based step number.
    pub fn number(self) -> u8 {
        match self {
            Self::Category => 1,
            Self::MagazinePackage => 2,
            Self::BrandDetails => 3,
            Self::Review => 4,
        }
    }

    /// Human-readable label shown in the progress indicator.
    pub fn label(self) -> &'static str {
        match self {
            Self::Category => "Category",
            Self::MagazinePackage => "Magazine & Package",
            Self::BrandDetails => "Brand Details",
            Self::Review => "Review",
        }
    }

    pub fn next(self) -> Option<Self> {
        Self::from_number(self.number() + 1).ok()
    }

    pub fn prev(self) -> Option<Self> {
        Self::from_number(self.number() - 1).ok()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Completed,
    Current,
    Upcoming,
}

/// One entry of the progress indicator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepProgress {
    pub step: BookingStep,
    pub number: u8,
    pub label: &'static str,
    pub status: StepStatus,
}

// ---------------------------------------------------------------------------
// Booking data
// ---------------------------------------------------------------------------

/// Opaque reference to a file the visitor picked. Only the most recent
/// selection per slot is kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileHandle {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

impl FileHandle {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size_bytes: None,
            content_type: None,
        }
    }
}

/// The brand contact form. Values are stored verbatim; only presence of
/// the full name and email is required to leave the Brand Details step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ContactDetails {
    #[validate(length(min = 1, message = "Full name is required"))]
    pub full_name: String,
    pub company_name: String,
    pub brand_name: String,
    pub contact_number: String,
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContactField {
    FullName,
    CompanyName,
    BrandName,
    ContactNumber,
    Email,
}

impl ContactDetails {
    pub fn set(&mut self, field: ContactField, value: String) {
        let slot = match field {
            ContactField::FullName => &mut self.full_name,
            ContactField::CompanyName => &mut self.company_name,
            ContactField::BrandName => &mut self.brand_name,
            ContactField::ContactNumber => &mut self.contact_number,
            ContactField::Email => &mut self.email,
        };
        *slot = value;
    }

    pub fn get(&self, field: ContactField) -> &str {
        match field {
            ContactField::FullName => &self.full_name,
            ContactField::CompanyName => &self.company_name,
            ContactField::BrandName => &self.brand_name,
            ContactField::ContactNumber => &self.contact_number,
            ContactField::Email => &self.email,
        }
    }
}

/// Everything the visitor has entered so far.
///
/// When `ad_packages` is non-empty every entry belongs to
/// `magazine.packages`; changing the magazine always clears the packages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingData {
    pub category: Option<String>,
    pub magazine: Option<Arc<Magazine>>,
    /// Unique by id, in selection order.
    pub ad_packages: Vec<AdPackage>,
    #[serde(flatten)]
    pub contact: ContactDetails,
    pub creative_file: Option<FileHandle>,
    pub brand_kit_file: Option<FileHandle>,
    pub needs_design_support: bool,
}

impl BookingData {
    /// Sum of the selected package prices. Derived on every call.
    pub fn total_cost(&self) -> Price {
        self.ad_packages.iter().map(|p| p.price).sum()
    }

    pub fn has_package(&self, package_id: &str) -> bool {
        self.ad_packages.iter().any(|p| p.id == package_id)
    }

    pub fn package_names(&self) -> Vec<&str> {
        self.ad_packages.iter().map(|p| p.name.as_str()).collect()
    }
}

/// Text shown to the visitor after a successful submission.
pub fn confirmation_message(data: &BookingData) -> String {
    let magazine = data.magazine.as_deref().map_or("", |m| m.name.as_str());
    format!(
        "Thank you, {}! Your submission for {} in {} (Total: ${}) has been received.",
        data.contact.full_name,
        data.package_names().join(", "),
        magazine,
        data.total_cost()
    )
}

// ---------------------------------------------------------------------------
// Events and outcomes
// ---------------------------------------------------------------------------

/// A visitor action against the booking form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BookingEvent {
    SelectCategory { category: String },
    SelectMagazine { magazine_id: String },
    TogglePackage { package_id: String },
    Advance,
    Back,
    SetField { field: ContactField, value: String },
    AttachCreativeFile { file: FileHandle },
    AttachBrandKitFile { file: FileHandle },
    ToggleDesignSupport,
    Submit,
    Cancel,
}

/// Terminal results handed to the completion collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "booking", rename_all = "snake_case")]
pub enum BookingOutcome {
    Completed(BookingData),
    Cancelled,
}

// ---------------------------------------------------------------------------
// State machine
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct BookingMachine {
    catalog: Arc<Catalog>,
    step: BookingStep,
    data: BookingData,
}

impl BookingMachine {
    /// A blank booking starting at the Category step.
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            step: BookingStep::Category,
            data: BookingData::default(),
        }
    }

    /// A booking pre-seeded with a magazine: starts at Magazine & Package
    /// with the category taken from the magazine.
    pub fn seeded(catalog: Arc<Catalog>, magazine: Arc<Magazine>) -> Self {
        let data = BookingData {
            category: Some(magazine.category.clone()),
            magazine: Some(magazine),
            ..BookingData::default()
        };
        Self {
            catalog,
            step: BookingStep::MagazinePackage,
            data,
        }
    }

    pub fn step(&self) -> BookingStep {
        self.step
    }

    pub fn data(&self) -> &BookingData {
        &self.data
    }

    pub fn total_cost(&self) -> Price {
        self.data.total_cost()
    }

    /// Magazines offered in the Magazine & Package step.
    pub fn available_magazines(&self) -> Vec<Arc<Magazine>> {
        match self.data.category.as_deref() {
            Some(category) => self.catalog.by_category(category),
            None => self.catalog.magazines().to_vec(),
        }
    }

    pub fn progress(&self) -> Vec<StepProgress> {
        BookingStep::ALL
            .iter()
            .map(|&step| StepProgress {
                step,
                number: step.number(),
                label: step.label(),
                status: if step < self.step {
                    StepStatus::Completed
                } else if step == self.step {
                    StepStatus::Current
                } else {
                    StepStatus::Upcoming
                },
            })
            .collect()
    }

    pub fn can_advance(&self) -> bool {
        self.advance_blocker().is_none()
    }

    pub fn can_go_back(&self) -> bool {
        self.step.prev().is_some()
    }

    pub fn can_cancel(&self) -> bool {
        self.step == BookingStep::Category
    }

    pub fn can_submit(&self) -> bool {
        self.step == BookingStep::Review
    }

    // -- transitions ---------------------------------------------------------

    /// Choose a category. Clears magazine and packages, then advances.
    pub fn select_category(&mut self, category: &str) -> Result<(), CoreError> {
        self.require_step(BookingStep::Category, "select a category")?;
        if !self.catalog.is_known_category(category) {
            return Err(CoreError::guard(format!("Unknown category '{category}'")));
        }

        self.data.category = Some(category.to_string());
        self.data.magazine = None;
        self.data.ad_packages.clear();
        self.step = BookingStep::MagazinePackage;

        tracing::debug!(category, "Booking category selected");
        Ok(())
    }

    /// Choose a magazine within the current category. Always clears packages.
    pub fn select_magazine(&mut self, magazine_id: &str) -> Result<(), CoreError> {
        self.require_step(BookingStep::MagazinePackage, "select a magazine")?;
        let magazine = self.catalog.require_magazine(magazine_id)?;
        match self.data.category.as_deref() {
            Some(category) if category == magazine.category => {}
            Some(category) => {
                return Err(CoreError::guard(format!(
                    "Magazine '{magazine_id}' is not in category '{category}'"
                )))
            }
            None => return Err(CoreError::guard("No category selected")),
        }

        self.data.magazine = Some(Arc::clone(magazine));
        self.data.ad_packages.clear();

        tracing::debug!(magazine_id, "Booking magazine selected");
        Ok(())
    }

    /// Add the package if absent, remove it if present.
    pub fn toggle_package(&mut self, package_id: &str) -> Result<(), CoreError> {
        self.require_step(BookingStep::MagazinePackage, "choose ad packages")?;
        let magazine = self
            .data
            .magazine
            .as_ref()
            .ok_or_else(|| CoreError::guard("Select a magazine before choosing packages"))?;
        let package = magazine.find_package(package_id).cloned().ok_or_else(|| {
            CoreError::guard(format!(
                "Package '{package_id}' is not offered by '{}'",
                magazine.name
            ))
        })?;

        if self.data.has_package(package_id) {
            self.data.ad_packages.retain(|p| p.id != package_id);
        } else {
            self.data.ad_packages.push(package);
        }

        tracing::debug!(
            package_id,
            selected = self.data.ad_packages.len(),
            total_cost = %self.data.total_cost(),
            "Booking package toggled"
        );
        Ok(())
    }

    pub fn advance(&mut self) -> Result<(), CoreError> {
        if let Some(reason) = self.advance_blocker() {
            tracing::debug!(step = ?self.step, %reason, "Booking advance rejected");
            return Err(CoreError::GuardViolation(reason));
        }
        // advance_blocker rejects Review, so a next step exists here.
        if let Some(next) = self.step.next() {
            tracing::debug!(from = ?self.step, to = ?next, "Booking advanced");
            self.step = next;
        }
        Ok(())
    }

    /// Go back one step. Values entered on the step being left are kept.
    pub fn back(&mut self) -> Result<(), CoreError> {
        let prev = self
            .step
            .prev()
            .ok_or_else(|| CoreError::guard("Already on the first step; cannot go back"))?;
        tracing::debug!(from = ?self.step, to = ?prev, "Booking went back");
        self.step = prev;
        Ok(())
    }

    pub fn set_field(&mut self, field: ContactField, value: String) -> Result<(), CoreError> {
        self.require_step(BookingStep::BrandDetails, "edit brand details")?;
        self.data.contact.set(field, value);
        Ok(())
    }

    pub fn attach_creative_file(&mut self, file: FileHandle) -> Result<(), CoreError> {
        self.require_step(BookingStep::BrandDetails, "attach a creative file")?;
        tracing::debug!(file = %file.name, "Creative file attached");
        self.data.creative_file = Some(file);
        Ok(())
    }

    pub fn attach_brand_kit_file(&mut self, file: FileHandle) -> Result<(), CoreError> {
        self.require_step(BookingStep::BrandDetails, "attach a brand kit")?;
        tracing::debug!(file = %file.name, "Brand kit attached");
        self.data.brand_kit_file = Some(file);
        Ok(())
    }

    pub fn toggle_design_support(&mut self) -> Result<(), CoreError> {
        self.require_step(BookingStep::BrandDetails, "request design support")?;
        self.data.needs_design_support = !self.data.needs_design_support;
        Ok(())
    }

    /// Finish the booking. Returns the completed snapshot and resets the
    /// machine to a blank booking.
    pub fn submit(&mut self) -> Result<BookingData, CoreError> {
        self.require_step(BookingStep::Review, "submit")?;
        let snapshot = std::mem::take(&mut self.data);
        self.step = BookingStep::Category;

        tracing::info!(
            magazine_id = snapshot.magazine.as_ref().map(|m| m.id.as_str()),
            packages = snapshot.ad_packages.len(),
            total_cost = %snapshot.total_cost(),
            "Booking submitted"
        );
        Ok(snapshot)
    }

    /// Abandon the booking from the first step.
    pub fn cancel(&mut self) -> Result<(), CoreError> {
        self.require_step(BookingStep::Category, "cancel")?;
        self.reset();
        tracing::info!("Booking cancelled");
        Ok(())
    }

    /// Unconditionally return to a blank booking.
    pub fn reset(&mut self) {
        self.step = BookingStep::Category;
        self.data = BookingData::default();
    }

    /// Apply a [`BookingEvent`]. Returns an outcome for submit and cancel.
    pub fn apply(&mut self, event: BookingEvent) -> Result<Option<BookingOutcome>, CoreError> {
        match event {
            BookingEvent::SelectCategory { category } => self.select_category(&category)?,
            BookingEvent::SelectMagazine { magazine_id } => self.select_magazine(&magazine_id)?,
            BookingEvent::TogglePackage { package_id } => self.toggle_package(&package_id)?,
            BookingEvent::Advance => self.advance()?,
            BookingEvent::Back => self.back()?,
            BookingEvent::SetField { field, value } => self.set_field(field, value)?,
            BookingEvent::AttachCreativeFile { file } => self.attach_creative_file(file)?,
            BookingEvent::AttachBrandKitFile { file } => self.attach_brand_kit_file(file)?,
            BookingEvent::ToggleDesignSupport => self.toggle_design_support()?,
            BookingEvent::Submit => return Ok(Some(BookingOutcome::Completed(self.submit()?))),
            BookingEvent::Cancel => {
                self.cancel()?;
                return Ok(Some(BookingOutcome::Cancelled));
            }
        }
        Ok(None)
    }

    // -- guards --------------------------------------------------------------

    fn require_step(&self, expected: BookingStep, action: &str) -> Result<(), CoreError> {
        if self.step == expected {
            Ok(())
        } else {
            Err(CoreError::guard(format!(
                "Cannot {action} on step {} ({}); only allowed on step {} ({})",
                self.step.number(),
                self.step.label(),
                expected.number(),
                expected.label()
            )))
        }
    }

    /// Why the current step cannot be left forwards, if it cannot.
    fn advance_blocker(&self) -> Option<String> {
        match self.step {
            BookingStep::Category if self.data.category.is_none() => {
                Some("Select a category first".to_string())
            }
            BookingStep::Category => None,
            BookingStep::MagazinePackage if self.data.magazine.is_none() => {
                Some("Select a magazine first".to_string())
            }
            BookingStep::MagazinePackage if self.data.ad_packages.is_empty() => {
                Some("Select at least one ad package".to_string())
            }
            BookingStep::MagazinePackage => None,
            BookingStep::BrandDetails => self.data.contact.validate().err().map(|errors| {
                let mut fields: Vec<String> = errors
                    .field_errors()
                    .keys()
                    .map(|k| k.to_string())
                    .collect();
                fields.sort();
                format!("Missing required contact fields: {}", fields.join(", "))
            }),
            BookingStep::Review => Some("Already on the final step; submit instead".to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
