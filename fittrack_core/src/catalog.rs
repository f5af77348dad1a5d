//! Built-in catalog of demo exercises.
//!
//! The UI shell renders these as selectable tiles with a larger demo image
//! per exercise; the core only owns the data.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// One demo exercise with its tile and demo image assets
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DemoExercise {
    pub id: String,
    pub name: String,
    /// Tile icon, relative to the application's asset directory
    pub icon_asset: String,
    /// Larger demonstration image shown on the detail view
    pub demo_asset: String,
}

/// The complete demo exercise catalog
#[derive(Clone, Debug)]
pub struct ExerciseCatalog {
    pub exercises: Vec<DemoExercise>,
}

impl ExerciseCatalog {
    /// Look up an exercise by id
    pub fn get(&self, id: &str) -> Option<&DemoExercise> {
        self.exercises.iter().find(|e| e.id == id)
    }

    /// Validate the catalog, returning a list of problems (empty when valid)
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        for exercise in &self.exercises {
            if exercise.name.trim().is_empty() {
                errors.push(format!("Exercise {:?} has an empty name", exercise.id));
            }
            if exercise.icon_asset.trim().is_empty() || exercise.demo_asset.trim().is_empty() {
                errors.push(format!("Exercise {:?} is missing asset paths", exercise.id));
            }
        }

        for (i, exercise) in self.exercises.iter().enumerate() {
            if self.exercises[..i].iter().any(|e| e.id == exercise.id) {
                errors.push(format!("Duplicate exercise id {:?}", exercise.id));
            }
        }

        errors
    }
}

/// Cached default catalog - built once and reused across all operations
static DEFAULT_CATALOG: Lazy<ExerciseCatalog> = Lazy::new(build_default_catalog);

/// Get a reference to the cached default catalog
pub fn default_catalog() -> &'static ExerciseCatalog {
    &DEFAULT_CATALOG
}

fn demo(id: &str, name: &str) -> DemoExercise {
    DemoExercise {
        id: id.into(),
        name: name.into(),
        icon_asset: format!("images/{id}_icon.jpg"),
        demo_asset: format!("images/{id}_demo.jpg"),
    }
}

/// Build the built-in demo exercise catalog
fn build_default_catalog() -> ExerciseCatalog {
    ExerciseCatalog {
        exercises: vec![
            demo("pushup", "Push-up"),
            demo("squat", "Squat"),
            demo("plank", "Plank"),
            demo("lunges", "Lunges"),
            demo("burpees", "Burpees"),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_is_valid() {
        let catalog = default_catalog();
        assert_eq!(catalog.exercises.len(), 5);
        assert!(catalog.validate().is_empty());
    }

    #[test]
    fn test_lookup_by_id() {
        let catalog = default_catalog();
        assert_eq!(catalog.get("squat").unwrap().name, "Squat");
        assert!(catalog.get("deadlift").is_none());
    }

    #[test]
    fn test_validate_flags_duplicates_and_blanks() {
        let catalog = ExerciseCatalog {
            exercises: vec![
                demo("pushup", "Push-up"),
                demo("pushup", "Push-up again"),
                DemoExercise {
                    id: "blank".into(),
                    name: " ".into(),
                    icon_asset: String::new(),
                    demo_asset: String::new(),
                },
            ],
        };

        let errors = catalog.validate();
        assert_eq!(errors.len(), 3);
    }
}
