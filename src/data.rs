//! Startup data records, fetched once as JSON and read-only afterwards.

use serde::{Deserialize, Serialize};

/// One row of a sprite sheet: `num_frames` cells of `w` x `h` laid out
/// left to right starting at (`x`, `y`).
#[derive(Debug, Deserialize, Serialize, Clone, Copy)]
#[serde(rename_all = "camelCase")]
pub struct FrameRow {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub num_frames: usize,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy)]
pub struct PointData {
    pub x: f32,
    pub y: f32,
}

/// Named animation rows of the player sheet.
#[derive(Debug, Deserialize, Serialize, Clone, Copy)]
pub struct PlayerAnims {
    pub stopped: usize,
    pub left: usize,
    pub right: usize,
    pub toward: usize,
    pub away: usize,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PlayerData {
    pub image_file_name: String,
    pub frames: Vec<FrameRow>,
    pub anims: PlayerAnims,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LayerData {
    pub file_name: String,
    pub y: f32,
    pub h: f32,
    pub scroll_ratio: f32,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct BackgroundData {
    pub layers: Vec<LayerData>,
    /// Display width of every layer, in pixels.
    pub width: f32,
    /// Horizontal scroll speed implied by a walk command, pixels per second.
    pub walk_rate: f32,
    pub player_position: PointData,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn background_data_round_trips_camel_case_keys() {
        let json = r#"{
            "layers": [
                { "fileName": "hills.png", "y": 60.0, "h": 240.0, "scrollRatio": 0.5 }
            ],
            "width": 800.0,
            "walkRate": 120.0,
            "playerPosition": { "x": 390.0, "y": 500.0 }
        }"#;
        let data: BackgroundData = serde_json::from_str(json).expect("parse");
        assert_eq!(data.layers.len(), 1);
        assert_eq!(data.layers[0].file_name, "hills.png");
        assert_eq!(data.layers[0].scroll_ratio, 0.5);
        assert_eq!(data.walk_rate, 120.0);
        assert_eq!(data.player_position.x, 390.0);
    }

    #[test]
    fn player_data_parses_frame_rows_and_anims() {
        let json = r#"{
            "imageFileName": "player-small.png",
            "frames": [
                { "x": 0.0, "y": 0.0, "w": 32.0, "h": 48.0, "numFrames": 4 },
                { "x": 0.0, "y": 48.0, "w": 32.0, "h": 48.0, "numFrames": 6 }
            ],
            "anims": { "stopped": 0, "left": 1, "right": 1, "toward": 0, "away": 0 }
        }"#;
        let data: PlayerData = serde_json::from_str(json).expect("parse");
        assert_eq!(data.frames[1].num_frames, 6);
        assert_eq!(data.anims.left, 1);
    }
}
