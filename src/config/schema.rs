use serde_json::{json, Value};
use std::sync::LazyLock;

pub static CONFIG_SCHEMA: LazyLock<Value> = LazyLock::new(|| {
    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "type": "object",
        "properties": {
            "projects": {
                "type": "array",
                "items": { "$ref": "#/$defs/project" }
            },
            "output": {
                "type": "object",
                "properties": {
                    "tests_dir": { "type": "string" },
                    "results_dir": { "type": "string" },
                    "logs_dir": { "type": "string" },
                    "keep_empty_tests": { "type": "boolean" }
                }
            },
            "engine": {
                "type": "object",
                "properties": {
                    "command": { "type": "string" },
                    "args": { "type": "array", "items": { "type": "string" } },
                    "grace_secs": { "type": "integer", "minimum": 0 }
                }
            }
        },
        "$defs": {
            "probability": { "type": "number", "minimum": 0.0, "maximum": 1.0 },
            "project": {
                "type": "object",
                "properties": {
                    "path": { "type": "string" },
                    "vulnerabilities": { "type": "string" },
                    "classpath_file_name": { "type": "string" },
                    "search_budget": { "type": "integer", "minimum": 2 },
                    "population_size": { "type": "integer", "minimum": 2 },
                    "ranking": { "type": "string", "enum": ["root-proximity", "target-distance"] },
                    "stop_on_first_success": { "type": "boolean" },
                    "chromosome_length": { "type": "integer", "minimum": 2 },
                    "branch_awareness": { "type": "boolean" },
                    "max_string_length": { "type": "integer", "minimum": 2, "maximum": 32767 },
                    "probability_add_calls_before_entry_method": { "$ref": "#/$defs/probability" },
                    "probability_primitive_reuse": { "$ref": "#/$defs/probability" },
                    "probability_primitive_pool": { "$ref": "#/$defs/probability" },
                    "probability_object_reuse": { "$ref": "#/$defs/probability" },
                    "probability_dynamic_pool": { "$ref": "#/$defs/probability" },
                    "probability_change_parameter": { "$ref": "#/$defs/probability" },
                    "seed_from_methods_in_goals": { "type": "boolean" },
                    "seed_from_branches_in_goals": { "type": "boolean" },
                    "metaheuristic": { "type": "string" },
                    "initial_population_algorithm": { "type": "string" },
                    "crossover": { "type": "string" },
                    "entry_method_mutation": { "type": "boolean" },
                    "exception_point_sampling": { "type": "boolean" },
                    "verbose_log": { "type": "boolean" }
                }
            }
        }
    })
});
