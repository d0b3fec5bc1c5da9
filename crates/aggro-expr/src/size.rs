unary_ops!(
    bson_size => "$bsonSize",
    binary_size => "$binarySize",
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::field;
    use serde_json::json;

    #[test]
    fn test_sizes() {
        assert_eq!(bson_size(field("$$ROOT")).to_value(), json!({"$bsonSize": "$$ROOT"}));
        assert_eq!(binary_size(field("blob")).to_value(), json!({"$binarySize": "$blob"}));
    }
}
