//! Food Repository
//!
//! Prices are normalized to 2 dp on every write.

use super::{BaseRepository, RepoError, RepoResult};
use crate::orders::money::round2;
use shared::models::{Food, FoodCreate, FoodUpdate};
use shared::util::{new_id, now_millis};

const TABLE: &str = "food";

#[derive(Clone)]
pub struct FoodRepository {
    base: BaseRepository,
}

impl FoodRepository {
    pub fn new(base: BaseRepository) -> Self {
        Self { base }
    }

    pub async fn find_all(&self) -> RepoResult<Vec<Food>> {
        self.base
            .run(async {
                let foods: Vec<Food> = self
                    .base
                    .db()
                    .query("SELECT * FROM food ORDER BY name")
                    .await?
                    .take(0)?;
                Ok(foods)
            })
            .await
    }

    pub async fn find_by_id(&self, food_id: &str) -> RepoResult<Option<Food>> {
        let food_id = food_id.to_string();
        self.base
            .run(async {
                let food: Option<Food> = self
                    .base
                    .db()
                    .query("SELECT * FROM food WHERE food_id = $food_id LIMIT 1")
                    .bind(("food_id", food_id))
                    .await?
                    .take(0)?;
                Ok(food)
            })
            .await
    }

    /// Batch lookup (missing ids are simply absent from the result)
    pub async fn find_by_ids(&self, food_ids: Vec<String>) -> RepoResult<Vec<Food>> {
        if food_ids.is_empty() {
            return Ok(Vec::new());
        }
        self.base
            .run(async {
                let foods: Vec<Food> = self
                    .base
                    .db()
                    .query("SELECT * FROM food WHERE food_id IN $ids")
                    .bind(("ids", food_ids))
                    .await?
                    .take(0)?;
                Ok(foods)
            })
            .await
    }

    /// Create a new food
    pub async fn create(&self, data: FoodCreate) -> RepoResult<Food> {
        let now = now_millis();
        let food = Food {
            food_id: new_id(),
            name: data.name,
            price: round2(data.price),
            food_image: data.food_image,
            menu_id: data.menu_id,
            created_at: now,
            updated_at: now,
        };

        self.base
            .run(async {
                let created: Option<Food> = self.base.db().create(TABLE).content(food).await?;
                created.ok_or_else(|| RepoError::Database("Failed to create food".into()))
            })
            .await
    }

    /// Patch a food; only provided fields change
    pub async fn update(&self, food_id: &str, data: FoodUpdate) -> RepoResult<Food> {
        let existing = self
            .find_by_id(food_id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Food {} not found", food_id)))?;

        let name = data.name.unwrap_or(existing.name);
        let price = data.price.map(round2).unwrap_or(existing.price);
        let food_image = data.food_image.unwrap_or(existing.food_image);
        let menu_id = data.menu_id.unwrap_or(existing.menu_id);
        let food_id = food_id.to_string();

        self.base
            .run(async {
                let updated: Option<Food> = self
                    .base
                    .db()
                    .query(
                        "UPDATE food SET name = $name, price = $price, food_image = $food_image, \
                         menu_id = $menu_id, updated_at = $now WHERE food_id = $food_id RETURN AFTER",
                    )
                    .bind(("name", name))
                    .bind(("price", price))
                    .bind(("food_image", food_image))
                    .bind(("menu_id", menu_id))
                    .bind(("now", now_millis()))
                    .bind(("food_id", food_id.clone()))
                    .await?
                    .take(0)?;
                updated.ok_or_else(|| RepoError::NotFound(format!("Food {} not found", food_id)))
            })
            .await
    }

    /// Hard delete; order items keep their (now dangling) reference
    pub async fn delete(&self, food_id: &str) -> RepoResult<bool> {
        let food_id = food_id.to_string();
        self.base
            .run(async {
                let deleted: Vec<Food> = self
                    .base
                    .db()
                    .query("DELETE food WHERE food_id = $food_id RETURN BEFORE")
                    .bind(("food_id", food_id))
                    .await?
                    .take(0)?;
                Ok(!deleted.is_empty())
            })
            .await
    }
}
