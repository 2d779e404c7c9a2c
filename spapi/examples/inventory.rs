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

use anyhow::Result;
use spapi::{ApiClient, Config};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let ctx = spapi::default_context();
    let config = Config::default().from_env(&ctx);
    let client = ApiClient::new(ctx, config).await?;

    let mut next_token = None;
    loop {
        let page = client
            .get_inventory_summaries(next_token.as_deref())
            .await?;

        for summary in page.payload.iter().flat_map(|p| &p.inventory_summaries) {
            println!(
                "{}\t{}\t{}",
                summary.seller_sku, summary.asin, summary.total_quantity
            );
        }

        match page.next_token() {
            Some(token) => next_token = Some(token.to_string()),
            None => break,
        }
    }

    client.stop().await;
    Ok(())
}
