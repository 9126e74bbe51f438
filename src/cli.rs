use std::path::PathBuf;

use clap::Parser;
use lazymodal::ModalOptions;
use lazymodal::dom::Length;

#[derive(Parser, Debug, Default)]
#[command(name = "lazymodal", version, about = "Centered modal dialogs over a page, in the terminal")]
pub struct Args {
    /// Config file to use instead of the default location
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Position the page modal against the viewport instead of the scrolled page
    #[arg(long)]
    pub fixed: bool,

    /// Do not create a backdrop
    #[arg(long)]
    pub no_overlay: bool,

    /// Clicking the backdrop does not dismiss
    #[arg(long)]
    pub no_blur: bool,

    /// The escape key does not dismiss
    #[arg(long)]
    pub no_escape: bool,

    /// Modal width, e.g. "640", "50%" or "auto"
    #[arg(long)]
    pub width: Option<Length>,

    /// Modal height, e.g. "480", "50%" or "auto"
    #[arg(long)]
    pub height: Option<Length>,

    /// Print the page as JSON with the modal open, then exit
    #[arg(long)]
    pub dump: bool,
}

impl Args {
    /// Apply the flags on top of the configured page modal options.
    pub fn apply(&self, options: &mut ModalOptions) {
        options.fixed |= self.fixed;
        options.overlay &= !self.no_overlay;
        options.blur &= !self.no_blur;
        options.escape &= !self.no_escape;
        if let Some(width) = &self.width {
            options.width = width.clone();
        }
        if let Some(height) = &self.height {
            options.height = height.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_options() {
        let args = Args::parse_from(["lazymodal", "--fixed", "--no-blur", "--width", "50%"]);
        let mut options = ModalOptions::default();

        args.apply(&mut options);

        assert!(options.fixed);
        assert!(!options.blur);
        assert!(options.overlay);
        assert_eq!(options.width, Length::Percent(50.0));
        assert_eq!(options.height, Length::Px(480.0));
    }

    #[test]
    fn test_no_flags_keep_config() {
        let args = Args::parse_from(["lazymodal"]);
        let mut options = ModalOptions {
            fixed: true,
            escape: false,
            ..ModalOptions::default()
        };

        args.apply(&mut options);

        assert!(options.fixed);
        assert!(!options.escape);
    }
}
