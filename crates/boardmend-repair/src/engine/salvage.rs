//! Fallback category/board for orphaned content.

use boardmend_core::errors::StorageError;
use boardmend_core::traits::{BoardCreator, Localizer};
use serde::{Deserialize, Serialize};

/// Cached salvage ids. Lives inside the serialized run, so it survives pauses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalvageArea {
    pub category_id: Option<i64>,
    pub board_id: Option<i64>,
}

impl SalvageArea {
    /// Salvage category id, looked up by localized name or created.
    pub fn category(
        &mut self,
        localizer: &dyn Localizer,
        creator: &dyn BoardCreator,
    ) -> Result<i64, StorageError> {
        if let Some(id) = self.category_id {
            return Ok(id);
        }
        let name = localizer.render("salvaged_category_name", &[]);
        let id = match creator.find_category(&name)? {
            Some(id) => id,
            None => creator.create_category(&name)?,
        };
        tracing::debug!(id_cat = id, "salvage category ready");
        self.category_id = Some(id);
        Ok(id)
    }

    /// Salvage board id inside the salvage category, looked up or created.
    pub fn board(
        &mut self,
        localizer: &dyn Localizer,
        creator: &dyn BoardCreator,
    ) -> Result<i64, StorageError> {
        if let Some(id) = self.board_id {
            return Ok(id);
        }
        let category = self.category(localizer, creator)?;
        let name = localizer.render("salvaged_board_name", &[]);
        let id = match creator.find_board(category, &name)? {
            Some(id) => id,
            None => {
                let description = localizer.render("salvaged_board_description", &[]);
                creator.create_board(category, &name, &description)?
            }
        };
        tracing::debug!(id_board = id, id_cat = category, "salvage board ready");
        self.board_id = Some(id);
        Ok(id)
    }
}
