use base64::{engine::general_purpose, Engine as _};
use log::warn;

/// 32x32 PNG window icon
const ICON_BASE64: &str = "iVBORw0KGgoAAAANSUhEUgAAACAAAAAgCAYAAABzenr0AAAAgElEQVR42u3XOw7AIAwDUC7Qq3L/BVExsEGahE+sypaYqpq30IaUGGOeXOos7dnRjfuSAH0d2dgC2AIZFVoBbsSszAMwI6QiL0CN+CpZAagQoQBNwSpARIQCtC/vAAwR9XIIIAAPEH4M+SXk3xBmIIEYySCGUoixHOJiAnM1+21en7y2nv3V11sAAAAASUVORK5CYII=";

/// Decode the embedded icon for the window viewport
pub fn load_icon() -> Option<egui::IconData> {
    let bytes = match general_purpose::STANDARD.decode(ICON_BASE64) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("Failed to decode window icon: {}", e);
            return None;
        }
    };

    match image::load_from_memory(&bytes) {
        Ok(img) => {
            let rgba = img.to_rgba8();
            let (width, height) = rgba.dimensions();
            Some(egui::IconData {
                rgba: rgba.into_raw(),
                width,
                height,
            })
        }
        Err(e) => {
            warn!("Failed to load window icon: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_icon_decodes() {
        let icon = load_icon().unwrap();
        assert_eq!((icon.width, icon.height), (32, 32));
        assert_eq!(icon.rgba.len(), 32 * 32 * 4);
    }
}
