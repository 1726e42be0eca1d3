use egui::{Color32, Visuals};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    /// Caption of the button that switches away from this theme
    pub fn toggle_label(self) -> &'static str {
        match self {
            Theme::Dark => "Switch to Light Theme",
            Theme::Light => "Switch to Dark Theme",
        }
    }

    /// Chart line colour: white on dark, black on light
    pub fn plot_color(self) -> Color32 {
        match self {
            Theme::Dark => Color32::WHITE,
            Theme::Light => Color32::BLACK,
        }
    }

    pub fn visuals(self) -> Visuals {
        match self {
            Theme::Dark => {
                let mut visuals = Visuals::dark();
                visuals.panel_fill = Color32::from_rgb(0x24, 0x34, 0x47);
                visuals.extreme_bg_color = Color32::from_rgb(0x0D, 0x1F, 0x2D);
                visuals
            }
            Theme::Light => Visuals::light(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_cycles() {
        assert_eq!(Theme::default(), Theme::Dark);
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
    }

    #[test]
    fn test_labels_and_colors() {
        assert_eq!(Theme::Dark.toggle_label(), "Switch to Light Theme");
        assert_eq!(Theme::Light.toggle_label(), "Switch to Dark Theme");
        assert_eq!(Theme::Dark.plot_color(), Color32::WHITE);
        assert_eq!(Theme::Light.plot_color(), Color32::BLACK);
        assert!(Theme::Dark.visuals().dark_mode);
        assert!(!Theme::Light.visuals().dark_mode);
    }
}
