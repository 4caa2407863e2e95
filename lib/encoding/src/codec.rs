use crate::{
    decode_qualifier, encode_qualifier, row_key, EncodingError, IndexRecord, KeyFragment, Permutation,
    RecordKind, RowKeyRef, StatementComponent,
};
use hexaplex_model::{
    BlankNode, CorruptionError, GraphName, GraphNameRef, NamedNode, NamedOrBlankNode, Quad,
    QuadRef, Subject, Term,
};
use std::str::FromStr;

/// Encodes a statement into its index records.
///
/// A statement in the default graph yields one record for each graph-agnostic permutation. A
/// statement in a named graph additionally yields one record for each graph-scoped permutation.
/// All records share the given `timestamp` and are tombstones if `delete` is set.
pub fn encode_statement(
    quad: QuadRef<'_>,
    delete: bool,
    timestamp: u64,
) -> Result<Vec<IndexRecord>, EncodingError> {
    let subject = quad.subject.to_string();
    let predicate = quad.predicate.to_string();
    let object = quad.object.to_string();
    let graph = match quad.graph_name {
        GraphNameRef::DefaultGraph => None,
        GraphNameRef::NamedNode(node) => Some(node.to_string()),
        GraphNameRef::BlankNode(node) => Some(node.to_string()),
    };

    let text_of = |component: StatementComponent| match component {
        StatementComponent::Subject => subject.as_str(),
        StatementComponent::Predicate => predicate.as_str(),
        StatementComponent::Object => object.as_str(),
    };
    let subject_fragment = KeyFragment::digest(&subject);
    let predicate_fragment = KeyFragment::digest(&predicate);
    let object_fragment = KeyFragment::digest(&object);
    let primary_fragment = |permutation: Permutation| match permutation.primary() {
        StatementComponent::Subject => subject_fragment,
        StatementComponent::Predicate => predicate_fragment,
        StatementComponent::Object => object_fragment,
    };
    let kind = if delete {
        RecordKind::Delete
    } else {
        RecordKind::Put
    };

    let mut records = Vec::with_capacity(if graph.is_some() { 6 } else { 3 });
    for permutation in Permutation::GRAPH_AGNOSTIC {
        let fields = permutation.components().map(text_of);
        records.push(IndexRecord {
            row: row_key(permutation, None, &primary_fragment(permutation)),
            qualifier: encode_qualifier(fields, None)?,
            timestamp,
            kind,
        });
    }
    if let Some(graph) = &graph {
        let context = KeyFragment::digest(graph);
        for permutation in Permutation::GRAPH_SCOPED {
            let fields = permutation.components().map(text_of);
            records.push(IndexRecord {
                row: row_key(permutation, Some(&context), &primary_fragment(permutation)),
                qualifier: encode_qualifier(fields, Some(graph))?,
                timestamp,
                kind,
            });
        }
    }
    Ok(records)
}

/// Rebuilds the statement stored in a cell from its row key and qualifier.
///
/// Fails if the qualifier is malformed, does not match the row key or holds text that is not a
/// valid canonical term.
pub fn decode_statement(row: &[u8], qualifier: &[u8]) -> Result<Quad, CorruptionError> {
    let key = RowKeyRef::parse(row)?;
    let permutation = key.permutation();
    let decoded = decode_qualifier(qualifier)?;

    if KeyFragment::digest(decoded.fields[0]).as_bytes().as_slice() != key.primary() {
        return Err(CorruptionError::msg(format!(
            "Qualifier of {permutation} row does not match the row key"
        )));
    }

    let mut subject = "";
    let mut predicate = "";
    let mut object = "";
    for (component, text) in permutation.components().into_iter().zip(decoded.fields) {
        match component {
            StatementComponent::Subject => subject = text,
            StatementComponent::Predicate => predicate = text,
            StatementComponent::Object => object = text,
        }
    }

    let graph_name = match (permutation.is_graph_scoped(), decoded.graph) {
        (false, None) => GraphName::DefaultGraph,
        (true, Some(graph)) => match parse_named_or_blank_node(graph)? {
            NamedOrBlankNode::NamedNode(node) => GraphName::NamedNode(node),
            NamedOrBlankNode::BlankNode(node) => GraphName::BlankNode(node),
        },
        (true, None) => {
            return Err(CorruptionError::msg(format!(
                "Qualifier of {permutation} row has no graph"
            )))
        }
        (false, Some(_)) => {
            return Err(CorruptionError::msg(format!(
                "Qualifier of {permutation} row has an unexpected graph"
            )))
        }
    };

    let subject = match parse_named_or_blank_node(subject)? {
        NamedOrBlankNode::NamedNode(node) => Subject::NamedNode(node),
        NamedOrBlankNode::BlankNode(node) => Subject::BlankNode(node),
    };
    let predicate = NamedNode::from_str(predicate).map_err(CorruptionError::new)?;
    let object = Term::from_str(object).map_err(CorruptionError::new)?;
    Ok(Quad::new(subject, predicate, object, graph_name))
}

/// Parses the canonical text of an IRI or blank node.
pub fn parse_named_or_blank_node(text: &str) -> Result<NamedOrBlankNode, CorruptionError> {
    if text.starts_with("_:") {
        BlankNode::from_str(text)
            .map(NamedOrBlankNode::BlankNode)
            .map_err(CorruptionError::new)
    } else {
        NamedNode::from_str(text)
            .map(NamedOrBlankNode::NamedNode)
            .map_err(CorruptionError::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexaplex_model::Literal;

    fn statement(graph: Option<&str>) -> Quad {
        Quad::new(
            NamedNode::new_unchecked("http://example.com/s"),
            NamedNode::new_unchecked("http://example.com/p"),
            Literal::new_language_tagged_literal_unchecked("value", "en"),
            graph.map_or(GraphName::DefaultGraph, |graph| {
                NamedNode::new_unchecked(graph).into()
            }),
        )
    }

    #[test]
    fn triple_yields_three_records() {
        let records = encode_statement(statement(None).as_ref(), false, 42).unwrap();
        assert_eq!(records.len(), 3);
        assert!(records
            .iter()
            .all(|r| r.timestamp == 42 && r.kind == RecordKind::Put));
        let tags = records.iter().map(|r| r.row[0]).collect::<Vec<_>>();
        assert_eq!(tags, [0, 1, 2]);
    }

    #[test]
    fn quad_yields_six_records() {
        let records =
            encode_statement(statement(Some("http://example.com/g")).as_ref(), true, 7).unwrap();
        assert_eq!(records.len(), 6);
        assert!(records.iter().all(|r| r.kind == RecordKind::Delete));
        let tags = records.iter().map(|r| r.row[0]).collect::<Vec<_>>();
        assert_eq!(tags, [0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn rows_are_keyed_by_primary_fragment() {
        let quad = statement(Some("http://example.com/g"));
        let records = encode_statement(quad.as_ref(), false, 0).unwrap();
        let graph = KeyFragment::digest("<http://example.com/g>");
        let predicate = KeyFragment::digest("<http://example.com/p>");

        assert_eq!(&records[1].row[1..], predicate.as_bytes());
        let cpos = RowKeyRef::parse(&records[4].row).unwrap();
        assert_eq!(cpos.context(), Some(graph.as_bytes().as_slice()));
        assert_eq!(cpos.primary(), predicate.as_bytes().as_slice());
    }

    #[test]
    fn qualifier_holds_canonical_texts_in_permutation_order() {
        let quad = statement(Some("http://example.com/g"));
        let records = encode_statement(quad.as_ref(), false, 0).unwrap();

        let osp = decode_qualifier(&records[2].qualifier).unwrap();
        assert_eq!(
            osp.fields,
            [
                "\"value\"@en",
                "<http://example.com/s>",
                "<http://example.com/p>"
            ]
        );
        assert_eq!(osp.graph, None);

        let cosp = decode_qualifier(&records[5].qualifier).unwrap();
        assert_eq!(cosp.fields, osp.fields);
        assert_eq!(cosp.graph, Some("<http://example.com/g>"));
    }

    #[test]
    fn every_record_decodes_to_the_statement() {
        for quad in [statement(None), statement(Some("http://example.com/g"))] {
            for record in encode_statement(quad.as_ref(), false, 0).unwrap() {
                let decoded = decode_statement(&record.row, &record.qualifier).unwrap();
                assert_eq!(decoded, quad);
            }
        }
    }

    #[test]
    fn blank_nodes_round_trip() {
        let quad = Quad::new(
            BlankNode::new_unchecked("b1"),
            NamedNode::new_unchecked("http://example.com/p"),
            BlankNode::new_unchecked("b2"),
            BlankNode::new_unchecked("g1"),
        );
        for record in encode_statement(quad.as_ref(), false, 0).unwrap() {
            assert_eq!(decode_statement(&record.row, &record.qualifier).unwrap(), quad);
        }
    }

    #[test]
    fn mismatching_row_key_is_corrupt() {
        let first = encode_statement(statement(None).as_ref(), false, 0).unwrap();
        let other = Quad::new(
            NamedNode::new_unchecked("http://example.com/other"),
            NamedNode::new_unchecked("http://example.com/p"),
            NamedNode::new_unchecked("http://example.com/o"),
            GraphName::DefaultGraph,
        );
        let second = encode_statement(other.as_ref(), false, 0).unwrap();
        assert!(decode_statement(&first[0].row, &second[0].qualifier).is_err());
    }
}
