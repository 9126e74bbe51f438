use lazymodal::dom::DomEvent;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Tick,
    Render,
    Resize(u16, u16),
    Suspend,
    Resume,
    Quit,
    ClearScreen,

    // Page
    OpenModal,
    NextContent,
    ToggleSize,
    OpenContainer,
    /// Scroll the window by this many rows.
    Scroll(i32),
    /// A terminal cell was clicked.
    Click(u16, u16),
    Dispatch(DomEvent),
}
