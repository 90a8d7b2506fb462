use crate::domain::Grid;
use std::fs;

pub struct FileRepository;

impl FileRepository {
    pub fn save_grid(grid: &Grid, filename: &str) -> Result<String, String> {
        match serde_json::to_string_pretty(grid) {
            Ok(json) => match fs::write(filename, &json) {
                Ok(_) => Ok(filename.to_string()),
                Err(e) => Err(e.to_string()),
            },
            Err(e) => Err(format!("Serialization failed: {}", e)),
        }
    }

    pub fn load_grid(filename: &str) -> Result<(Grid, String), String> {
        match fs::read_to_string(filename) {
            Ok(content) => match serde_json::from_str::<Grid>(&content) {
                Ok(grid) if grid.is_well_formed() => Ok((grid, filename.to_string())),
                Ok(_) => Err("Invalid file format - grid is not rectangular".to_string()),
                Err(e) => Err(format!("Invalid file format - {}", e)),
            },
            Err(e) => Err(e.to_string()),
        }
    }
}
