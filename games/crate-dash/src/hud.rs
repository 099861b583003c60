use serde::Serialize;

use crate::powerup::PowerUpEffect;

/// Text surfaces the game writes to. The game never touches the page
/// directly; the web build reads a [`Hud`] snapshot instead.
pub trait Presenter {
    fn update_timer_text(&mut self, text: &str);
    fn show_power_up_banner(&mut self, text: &str);
    fn hide_power_up_banner(&mut self);
    fn show_message(&mut self, text: &str);
    fn hide_message(&mut self);
}

pub fn timer_text(seconds: i32) -> String {
    format!("Time: {seconds}s")
}

pub fn banner_text(effect: PowerUpEffect) -> String {
    format!("Power-Up: {}", effect.label())
}

/// Serialisable HUD state, fetched by the page with `get_hud_json()`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Hud {
    pub timer: String,
    pub banner: Option<String>,
    pub message: Option<String>,
}

impl Hud {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl Presenter for Hud {
    fn update_timer_text(&mut self, text: &str) {
        self.timer = text.to_owned();
    }

    fn show_power_up_banner(&mut self, text: &str) {
        self.banner = Some(text.to_owned());
    }

    fn hide_power_up_banner(&mut self) {
        self.banner = None;
    }

    fn show_message(&mut self, text: &str) {
        self.message = Some(text.to_owned());
    }

    fn hide_message(&mut self) {
        self.message = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn texts() {
        assert_eq!(timer_text(20), "Time: 20s");
        assert_eq!(banner_text(PowerUpEffect::SlowFall), "Power-Up: Slow Fall");
        assert_eq!(banner_text(PowerUpEffect::SpeedBoost), "Power-Up: Speed Boost");
    }

    #[test]
    fn hud_serialises_visible_state() {
        let mut hud = Hud::default();
        hud.update_timer_text("Time: 7s");
        hud.show_power_up_banner("Power-Up: Speed Boost");
        assert_eq!(
            hud.to_json().unwrap(),
            r#"{"timer":"Time: 7s","banner":"Power-Up: Speed Boost","message":null}"#
        );

        hud.hide_power_up_banner();
        hud.show_message("Game Over! Time Ran Out!");
        let value: serde_json::Value = serde_json::from_str(&hud.to_json().unwrap()).unwrap();
        assert_eq!(value["banner"], serde_json::Value::Null);
        assert_eq!(value["message"], "Game Over! Time Ran Out!");
    }
}
