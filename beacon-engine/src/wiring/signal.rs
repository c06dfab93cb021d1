//! Interaction signals delivered by the host shell.

/// One observed page interaction. The host forwards these over an
/// unbounded channel; `Unload` (or closing the channel) ends the page
/// load and triggers the final summary events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageSignal {
    /// Current scroll position as a percentage of scrollable height.
    Scrolled { percent: u8 },
    /// Click on an element marked for instrumentation.
    ElementClick {
        element_id: String,
        element_type: String,
        x: i64,
        y: i64,
    },
    /// Pointer entered a CTA button.
    HoverStart { button_text: String },
    /// Pointer left a CTA button.
    HoverEnd { button_text: String },
    /// A form was submitted.
    FormSubmit { form_id: String },
    /// The page is going away.
    Unload,
}
