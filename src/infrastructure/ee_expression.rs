// Earth Engine expression graphs
//
// A computation is a set of nodes keyed by id plus the id of the result node.
// Nothing here talks to the network; the graph is submitted as a whole by the repository.
use crate::domain::location::{DateRange, Location};
use crate::infrastructure::config::DatasetSettings;
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;

const MAPPING_VAR: &str = "_MAPPING_VAR_0_0";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ValueNode {
    ConstantValue(Value),
    ArrayValue {
        values: Vec<ValueNode>,
    },
    #[serde(rename_all = "camelCase")]
    FunctionInvocationValue {
        function_name: String,
        arguments: BTreeMap<String, ValueNode>,
    },
    #[serde(rename_all = "camelCase")]
    FunctionDefinitionValue {
        argument_names: Vec<String>,
        body: String,
    },
    ArgumentReference(String),
}

impl ValueNode {
    pub fn constant<V: Into<Value>>(value: V) -> Self {
        Self::ConstantValue(value.into())
    }

    pub fn invoke<const N: usize>(function_name: &str, arguments: [(&str, ValueNode); N]) -> Self {
        Self::FunctionInvocationValue {
            function_name: function_name.to_string(),
            arguments: arguments
                .into_iter()
                .map(|(name, node)| (name.to_string(), node))
                .collect(),
        }
    }

    pub fn array(values: Vec<ValueNode>) -> Self {
        Self::ArrayValue { values }
    }

    pub fn argument(name: &str) -> Self {
        Self::ArgumentReference(name.to_string())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Expression {
    pub values: BTreeMap<String, ValueNode>,
    pub result: String,
}

impl Expression {
    /// Register a node and return its id
    pub fn push(&mut self, node: ValueNode) -> String {
        let id = self.values.len().to_string();
        self.values.insert(id.clone(), node);
        id
    }

    pub fn with_result(mut self, node: ValueNode) -> Self {
        self.result = self.push(node);
        self
    }
}

/// Mean of the dataset band at `location` for every image in `range`, each row labelled with its date.
///
/// Equivalent to
/// `ImageCollection(collection).filterDate(start, end).map(img -> img.select(band)
///     .reduceRegions(point, mean, scale).first().set("date", img.date().format(fmt)))`.
pub fn point_time_series(dataset: &DatasetSettings, location: &Location, range: &DateRange) -> Expression {
    let mut expression = Expression::default();

    let image = || ValueNode::argument(MAPPING_VAR);
    let point = ValueNode::invoke(
        "GeometryConstructors.Point",
        [("coordinates", ValueNode::constant(json!([location.lon, location.lat])))],
    );
    let region = ValueNode::invoke(
        "Collection",
        [("features", ValueNode::array(vec![ValueNode::invoke("Feature", [("geometry", point)])]))],
    );
    let band = ValueNode::invoke(
        "Image.select",
        [
            ("input", image()),
            ("bandSelectors", ValueNode::array(vec![ValueNode::constant(dataset.band.as_str())])),
        ],
    );
    let reduced = ValueNode::invoke(
        "Image.reduceRegions",
        [
            ("image", band),
            ("collection", region),
            ("reducer", ValueNode::invoke("Reducer.mean", [])),
            ("scale", ValueNode::constant(dataset.scale_meters)),
        ],
    );
    let date = ValueNode::invoke(
        "Date.format",
        [
            ("date", ValueNode::invoke("Image.date", [("image", image())])),
            ("format", ValueNode::constant(dataset.date_format.as_str())),
        ],
    );
    let labelled = ValueNode::invoke(
        "Element.set",
        [
            ("object", ValueNode::invoke("Collection.first", [("collection", reduced)])),
            ("key", ValueNode::constant("date")),
            ("value", date),
        ],
    );
    let body = expression.push(labelled);

    let date_node = |value: &str| ValueNode::invoke("Date", [("value", ValueNode::constant(value))]);
    let filtered = ValueNode::invoke(
        "Collection.filter",
        [
            (
                "collection",
                ValueNode::invoke("ImageCollection.load", [("id", ValueNode::constant(dataset.collection.as_str()))]),
            ),
            (
                "filter",
                ValueNode::invoke(
                    "Filter.dateRangeContains",
                    [
                        (
                            "leftValue",
                            ValueNode::invoke(
                                "DateRange",
                                [("start", date_node(&range.inicio)), ("end", date_node(&range.fin))],
                            ),
                        ),
                        ("rightField", ValueNode::constant("system:time_start")),
                    ],
                ),
            ),
        ],
    );

    expression.with_result(ValueNode::invoke(
        "Collection.map",
        [
            ("collection", filtered),
            (
                "baseAlgorithm",
                ValueNode::FunctionDefinitionValue {
                    argument_names: vec![MAPPING_VAR.to_string()],
                    body,
                },
            ),
        ],
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset() -> DatasetSettings {
        DatasetSettings {
            collection: "MODIS/061/MOD13Q1".to_string(),
            band: "NDVI".to_string(),
            scale_meters: 250.0,
            scale_factor: 0.0001,
            decimals: 4,
            date_format: "YYYY-MM-dd".to_string(),
        }
    }

    fn build() -> Value {
        let location = Location::new(-12.046374, -77.042793).unwrap();
        let range = DateRange::new("2022-01-01".to_string(), "2022-01-31".to_string()).unwrap();
        serde_json::to_value(point_time_series(&dataset(), &location, &range)).unwrap()
    }

    #[test]
    fn test_node_encoding() {
        let node = ValueNode::invoke("Reducer.mean", []);
        assert_eq!(
            serde_json::to_value(&node).unwrap(),
            json!({"functionInvocationValue": {"functionName": "Reducer.mean", "arguments": {}}})
        );

        let def = ValueNode::FunctionDefinitionValue {
            argument_names: vec!["x".to_string()],
            body: "0".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&def).unwrap(),
            json!({"functionDefinitionValue": {"argumentNames": ["x"], "body": "0"}})
        );
        assert_eq!(
            serde_json::to_value(ValueNode::argument("x")).unwrap(),
            json!({"argumentReference": "x"})
        );
    }

    #[test]
    fn test_result_is_a_single_remote_map() {
        let expr = build();
        let result = expr["result"].as_str().unwrap();
        let root = &expr["values"][result]["functionInvocationValue"];

        assert_eq!(root["functionName"], "Collection.map");
        let algorithm = &root["arguments"]["baseAlgorithm"]["functionDefinitionValue"];
        assert_eq!(algorithm["argumentNames"], json!([MAPPING_VAR]));

        let body_id = algorithm["body"].as_str().unwrap();
        let body = &expr["values"][body_id]["functionInvocationValue"];
        assert_eq!(body["functionName"], "Element.set");
        assert_eq!(body["arguments"]["key"]["constantValue"], "date");
    }

    #[test]
    fn test_query_parameters() {
        let expr = build();
        let text = expr.to_string();

        assert!(text.contains(r#""constantValue":"MODIS/061/MOD13Q1""#));
        assert!(text.contains(r#""constantValue":"NDVI""#));
        assert!(text.contains(r#""constantValue":[-77.042793,-12.046374]"#));
        assert!(text.contains(r#""constantValue":"2022-01-01""#));
        assert!(text.contains(r#""constantValue":"2022-01-31""#));
        assert!(text.contains(r#""constantValue":250.0"#));
        assert!(text.contains(r#""constantValue":"YYYY-MM-dd""#));
    }
}
