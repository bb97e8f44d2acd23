use bigdecimal::BigDecimal;
use diesel::prelude::*;

use crate::domain::errors::DomainError;
use crate::domain::order::{DishPrice, OptionPrice};
use crate::domain::ports::MenuCatalog;
use crate::schema::{addons, dishes, options};

use super::DieselStore;

impl MenuCatalog for DieselStore {
    fn find_dish(&self, dish_id: i32) -> Result<Option<DishPrice>, DomainError> {
        let mut conn = self.pool.get()?;
        let row = dishes::table
            .find(dish_id)
            .select((dishes::id, dishes::title, dishes::base_price))
            .first::<(i32, String, BigDecimal)>(&mut conn)
            .optional()?;
        Ok(row.map(|(id, title, base_price)| DishPrice {
            id,
            title,
            base_price,
        }))
    }

    fn find_options(
        &self,
        dish_id: i32,
        option_ids: &[i32],
    ) -> Result<Vec<OptionPrice>, DomainError> {
        if option_ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.pool.get()?;
        let rows = options::table
            .inner_join(addons::table)
            .filter(addons::dish_id.eq(dish_id))
            .filter(options::id.eq_any(option_ids.to_vec()))
            .order(options::id.asc())
            .select((options::id, options::title, options::price))
            .load::<(i32, String, BigDecimal)>(&mut conn)?;
        Ok(rows
            .into_iter()
            .map(|(id, title, price)| OptionPrice { id, title, price })
            .collect())
    }
}
