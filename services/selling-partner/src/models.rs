// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Response models of the supported operations.
//!
//! Only the fields this client reads are modelled, everything is optional on
//! the wire and decodes to its default when missing.

use serde::Deserialize;

/// An entry of the `errors` array returned by every operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ApiError {
    /// An error code that identifies the type of error that occurred.
    pub code: String,
    /// A message that describes the error condition.
    pub message: String,
    /// Additional details that can help the caller understand or fix the issue.
    pub details: Option<String>,
}

/// Pagination cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Pagination {
    /// Pass this back as `next_token` to fetch the next page.
    pub next_token: Option<String>,
}

/// Response of `GET /fba/inventory/v1/summaries`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GetInventorySummariesResponse {
    pub payload: Option<GetInventorySummariesResult>,
    pub pagination: Option<Pagination>,
    pub errors: Vec<ApiError>,
}

impl GetInventorySummariesResponse {
    /// The cursor of the next page, if there is one.
    pub fn next_token(&self) -> Option<&str> {
        self.pagination.as_ref()?.next_token.as_deref()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GetInventorySummariesResult {
    pub granularity: Granularity,
    pub inventory_summaries: Vec<InventorySummary>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Granularity {
    pub granularity_type: String,
    pub granularity_id: String,
}

/// Inventory of one seller SKU.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InventorySummary {
    pub asin: String,
    pub fn_sku: String,
    pub seller_sku: String,
    pub condition: String,
    pub inventory_details: Option<InventoryDetails>,
    pub last_updated_time: Option<String>,
    pub product_name: String,
    pub total_quantity: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InventoryDetails {
    pub fulfillable_quantity: i64,
    pub inbound_working_quantity: i64,
    pub inbound_shipped_quantity: i64,
    pub inbound_receiving_quantity: i64,
    pub reserved_quantity: ReservedQuantity,
    pub researching_quantity: ResearchingQuantity,
    pub unfulfillable_quantity: UnfulfillableQuantity,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReservedQuantity {
    pub total_reserved_quantity: i64,
    pub pending_customer_order_quantity: i64,
    pub pending_transshipment_quantity: i64,
    pub fc_processing_quantity: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResearchingQuantity {
    pub total_researching_quantity: i64,
    pub researching_quantity_breakdown: Vec<ResearchingQuantityEntry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ResearchingQuantityEntry {
    /// `researchingQuantityInShortTerm`, `researchingQuantityInMidTerm` or
    /// `researchingQuantityInLongTerm`.
    pub name: String,
    pub quantity: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UnfulfillableQuantity {
    pub total_unfulfillable_quantity: i64,
    pub customer_damaged_quantity: i64,
    pub warehouse_damaged_quantity: i64,
    pub distributor_damaged_quantity: i64,
    pub carrier_damaged_quantity: i64,
    pub defective_quantity: i64,
    pub expired_quantity: i64,
}

/// Response of `GET /orders/v0/orders`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GetOrdersResponse {
    pub payload: Option<OrdersList>,
    pub errors: Vec<ApiError>,
}

/// A page of orders. The orders API uses PascalCase field names.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct OrdersList {
    pub orders: Vec<Order>,
    pub next_token: Option<String>,
    pub created_before: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct Order {
    pub amazon_order_id: String,
    pub purchase_date: String,
    pub last_update_date: String,
    pub order_status: String,
    pub fulfillment_channel: Option<String>,
    pub sales_channel: Option<String>,
    pub order_total: Option<Money>,
    pub number_of_items_shipped: Option<i64>,
    pub number_of_items_unshipped: Option<i64>,
    pub marketplace_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct Money {
    pub currency_code: String,
    pub amount: String,
}
