pub mod error;

pub mod config;

pub mod host;

pub mod library_view;
pub use library_view::LibraryView;

pub mod controller {
    pub mod input;
    pub use input::{Button, Buttons};

    pub mod selection;
    pub use selection::{LaunchRequest, SelectionController};
}

pub mod model {
    pub mod entry_store;
    pub use entry_store::EntryStore;

    pub mod view_state;
    pub use view_state::{Layout, ViewState};
}

pub mod view {
    pub mod draw;
    pub use draw::{DrawCommand, DrawList, DrawMode, DrawSurface};

    pub mod renderer;
    pub use renderer::LibraryRenderer;
}

pub mod fs {
    pub mod populator;
    pub use populator::{RomFilter, WalkDirLister, populate};
}

pub mod tui {
    pub mod assets;
    pub use assets::BuiltinAssets;

    pub mod keyboard;
    pub use keyboard::{KeyOutcome, KeyboardInput};

    pub mod surface;
    pub use surface::TerminalSurface;
}

pub mod logging;
pub use logging::Logger;

pub use config::Config;
pub use error::AppError;
