//! Market order decision variables

use crate::models::{MarketOrder, OrderSide, TradeEntry};
use crate::solver::{Assignment, LinearExpr, Model, VarId};

use super::coeff;

/// Decision variable for how much of one market order to fill
#[derive(Debug)]
pub struct MarketOrderNode<'a> {
    pub order: &'a MarketOrder,
    traded: VarId,
}

impl<'a> MarketOrderNode<'a> {
    /// Create the traded-quantity variable, bounded by the order's capacity.
    ///
    /// Orders the market places to buy from us are not wired into the balance
    /// or the objective yet, so their variable is pinned to zero.
    pub fn new(model: &mut Model, order: &'a MarketOrder, effective_infinity: i64) -> Self {
        let upper = match order.side {
            OrderSide::Sell => order.capacity.resolve(effective_infinity),
            OrderSide::Buy => 0,
        };
        let traded = model.new_int_var(0, upper, format!("market_trade_{}", order.trade_id));

        Self { order, traded }
    }

    pub fn var(&self) -> VarId {
        self.traded
    }

    pub fn is_sell(&self) -> bool {
        self.order.side == OrderSide::Sell
    }

    pub fn quantity(&self) -> LinearExpr {
        LinearExpr::term(self.traded, 1)
    }

    /// quantity traded x unit price
    pub fn trade_value(&self) -> LinearExpr {
        LinearExpr::term(self.traded, coeff(self.order.unit_price))
    }

    pub fn decode(&self, assignment: &Assignment) -> Option<TradeEntry> {
        let quantity = assignment.value(self.traded);
        if quantity <= 0 {
            return None;
        }

        Some(TradeEntry {
            trade_id: self.order.trade_id.clone(),
            item_id: self.order.item_id.clone(),
            quantity: quantity as u64,
            unit_price: self.order.unit_price,
        })
    }
}
