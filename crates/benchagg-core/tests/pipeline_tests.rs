// benchagg - Benchmark log aggregation toolkit
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Integration tests for both log pipelines on realistic harness output.

use benchagg_core::{
    aggregate_metric_log, average_tables, parse_blocks, AggError, AggregateConfig, BlockConfig,
    MetricFilter, MissingKeyPolicy,
};
use std::io::Cursor;

const HARNESS_LOG: &str = "\
Using skiplist
Running with 1 threads

metric: put, malloc: jemalloc, threads: 1, total_throughput: 5100000, avg_throughput: 5100000
metric: put, malloc: tcmalloc, threads: 1, total_throughput: 4900000, avg_throughput: 4900000
metric: get, malloc: jemalloc, threads: 1, total_throughput: 9000000, avg_throughput: 9000000
metric: put, malloc: jemalloc, threads: 1, total_throughput: 5300000, avg_throughput: 5300000
metric: put, malloc: tcmalloc, threads: 1, total_throughput: 5100000, avg_throughput: 5100000
Running with 4 threads
metric: put, malloc: jemalloc, threads: 4, total_throughput: 16000000, avg_throughput: 4000000
metric: put, malloc: tcmalloc, threads: 4, total_throughput: 14000000, avg_throughput: 3500000
metric: put_batch, malloc: jemalloc, threads: 4, total_throughput: 16800000, avg_throughput: 4200000
metric: put_batch, malloc: tcmalloc, threads: 4, total_throughput: 14400000, avg_throughput: 3600000
done
";

#[test]
fn test_harness_log_aggregates_put_metrics() {
    let table =
        aggregate_metric_log(Cursor::new(HARNESS_LOG), &AggregateConfig::default()).unwrap();

    assert_eq!(table.header(), ["threads", "jemalloc", "tcmalloc"]);
    assert_eq!(table.rows().len(), 2);
    assert_eq!(table.rows()[0].threads, 1);
    assert_eq!(table.rows()[0].means, vec![5_200_000, 5_000_000]);
    assert_eq!(table.rows()[1].threads, 4);
    assert_eq!(table.rows()[1].means, vec![4_100_000, 3_550_000]);
}

#[test]
fn test_harness_log_with_get_prefix() {
    let config = AggregateConfig {
        filter: MetricFilter::new("get"),
        missing_key: MissingKeyPolicy::Error,
    };
    let table = aggregate_metric_log(Cursor::new(HARNESS_LOG), &config).unwrap();
    assert_eq!(table.header(), ["threads", "jemalloc"]);
    assert_eq!(table.rows()[0].means, vec![9_000_000]);
}

#[test]
fn test_banner_only_log_is_rejected() {
    let err = aggregate_metric_log(Cursor::new("Using skiplist\n\n"), &AggregateConfig::default())
        .unwrap_err();
    assert!(matches!(err, AggError::DataFormat(_)));
}

#[test]
fn test_repeated_block_runs_average() {
    let run = |scale: f64| {
        format!(
            "bench skiplist-put-jemalloc\n\
             metric: put, #threads: 1, total throughput: {t1}, avg throughput: {t1}\n\
             1.0,0.5,{c1}%,1000,10,2\n\
             --\n\
             bench skiplist-put-jemalloc\n\
             metric: put, #threads: 4, total throughput: {t4}, avg throughput: {t4}\n\
             4.0,1.5,{c4}%,4000,40,8\n\
             --\n",
            t1 = 100.0 * scale,
            t4 = 400.0 * scale,
            c1 = 100.0 * scale,
            c4 = 350.0 * scale,
        )
    };

    let tables: Vec<_> = [1.0, 2.0, 3.0]
        .iter()
        .map(|s| parse_blocks(Cursor::new(run(*s)), &BlockConfig::default()).unwrap())
        .collect();
    let avg = average_tables(&tables).unwrap();

    assert_eq!(avg.rows.len(), 2);
    assert_eq!(avg.rows[0].values, [1.0, 200.0, 1.0, 0.5, 2.0, 1000.0, 10.0, 2.0]);
    assert_eq!(avg.rows[1].threads(), 4.0);
    assert_eq!(avg.rows[1].throughput(), 800.0);
}

#[test]
fn test_block_log_with_4n_plus_1_lines() {
    let mut log = String::new();
    for threads in [1, 2, 4] {
        log.push_str(&format!(
            "hdr\nmetric: put, #threads: {threads}, avg throughput: 1.0\n1,1,1%,1,1,1\nend\n"
        ));
    }
    log.push_str("hdr\n");
    let table = parse_blocks(Cursor::new(log), &BlockConfig::default()).unwrap();
    assert_eq!(table.len(), 3);
}
