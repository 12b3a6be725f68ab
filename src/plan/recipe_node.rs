//! Recipe craft-count variables

use crate::models::{CraftEntry, Recipe};
use crate::solver::{Assignment, LinearExpr, Model, VarId};

use super::coeff;

/// Decision variable for how many times to run one recipe
#[derive(Debug)]
pub struct RecipeNode<'a> {
    pub recipe: &'a Recipe,
    crafts: VarId,
}

impl<'a> RecipeNode<'a> {
    pub fn new(model: &mut Model, recipe: &'a Recipe, effective_infinity: i64) -> Self {
        let crafts = model.new_int_var(0, effective_infinity, format!("recipe_crafted_{}", recipe.recipe_id));
        Self { recipe, crafts }
    }

    pub fn var(&self) -> VarId {
        self.crafts
    }

    pub fn craft_count(&self) -> LinearExpr {
        LinearExpr::term(self.crafts, 1)
    }

    /// Units of the produced item, crafts x produced quantity
    pub fn produced_quantity(&self) -> LinearExpr {
        LinearExpr::term(self.crafts, coeff(self.recipe.produced.quantity))
    }

    /// Units of `item_id` used up, crafts x consumed quantity
    pub fn consumed_quantity(&self, item_id: &str) -> LinearExpr {
        LinearExpr::term(self.crafts, coeff(self.recipe.consumed_qty(item_id)))
    }

    pub fn decode(&self, assignment: &Assignment) -> Option<CraftEntry> {
        let count = assignment.value(self.crafts);
        if count <= 0 {
            return None;
        }

        Some(CraftEntry {
            recipe_id: self.recipe.recipe_id.clone(),
            count: count as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ItemQuantity;

    fn stick_recipe() -> Recipe {
        Recipe::new(
            "stick",
            ItemQuantity::new("stick", 4),
            vec![ItemQuantity::new("plank", 2)],
        )
    }

    #[test]
    fn quantities_scale_with_craft_count() {
        let recipe = stick_recipe();
        let mut model = Model::new();
        let node = RecipeNode::new(&mut model, &recipe, 1_000);
        let assignment = Assignment::new(vec![3]);

        assert_eq!(assignment.evaluate(&node.produced_quantity()), 12);
        assert_eq!(assignment.evaluate(&node.consumed_quantity("plank")), 6);
        assert_eq!(assignment.evaluate(&node.consumed_quantity("stick")), 0);
        assert_eq!(model.var(node.var()).upper, 1_000);
    }

    #[test]
    fn decode_skips_unused_recipes() {
        let recipe = stick_recipe();
        let mut model = Model::new();
        let node = RecipeNode::new(&mut model, &recipe, 1_000);

        assert_eq!(node.decode(&Assignment::new(vec![0])), None);
        assert_eq!(
            node.decode(&Assignment::new(vec![2])),
            Some(CraftEntry {
                recipe_id: "stick".to_string(),
                count: 2
            })
        );
    }
}
