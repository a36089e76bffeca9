//! Collection projection of list results.
//!
//! When a client asks for `application/ld+json`, the members returned by a
//! list operation are wrapped into a `hydra:Collection` whose `totalItems`
//! is the full, unpaged count. A bounded page (`$top` > 0) additionally gets
//! a `hydra:PartialCollectionView` with first/previous/next/last links.

use hydrant_convert::media;
use hydrant_core::{Capability, HydrantResult, ParameterRole, RequestInfo, TypeShape};
use hydrant_extract::Arguments;
use hydrant_server::{OperationDescriptor, Outcome, ResponseTransformer};
use serde_json::Value;
use tracing::debug;

use crate::graph::{CollectionNode, HypermediaGraph, HypermediaNode, PartialCollectionView};
use crate::jsonld::APPLICATION_LD_JSON;

/// One page of a collection, ready to be projected.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionPage {
    /// IRI of the collection, without a query string.
    pub collection_iri: String,
    /// Query string of the request; parameters other than paging ones are
    /// kept in the view links.
    pub query: Option<String>,
    /// Members of this page.
    pub members: Vec<Value>,
    /// Full, unpaged count.
    pub total_items: u64,
    /// Number of skipped members.
    pub skip: u64,
    /// Page size, `0` meaning unbounded.
    pub take: u64,
}

impl CollectionPage {
    /// Creates an unbounded page.
    #[must_use]
    pub fn new(collection_iri: impl Into<String>, members: Vec<Value>, total_items: u64) -> Self {
        Self {
            collection_iri: collection_iri.into(),
            query: None,
            members,
            total_items,
            skip: 0,
            take: 0,
        }
    }

    /// Sets the paging window.
    #[must_use]
    pub fn paged(mut self, skip: u64, take: u64) -> Self {
        self.skip = skip;
        self.take = take;
        self
    }

    /// Keeps the request query string in view links.
    #[must_use]
    pub fn with_query(mut self, query: Option<&str>) -> Self {
        self.query = query.map(ToString::to_string);
        self
    }

    /// Projects the page into a graph holding the collection and, for
    /// bounded pages, its view.
    #[must_use]
    pub fn project(self) -> HypermediaGraph {
        let mut graph = HypermediaGraph::new();
        let view = (self.take > 0).then(|| self.view());
        let view_id = view.as_ref().map(|view| view.id.clone());

        graph.insert(HypermediaNode::Collection(CollectionNode {
            id: self.collection_iri,
            total_items: self.total_items,
            members: self.members,
            view: view_id,
        }));
        if let Some(view) = view {
            graph.insert(HypermediaNode::PartialCollectionView(view));
        }
        graph
    }

    fn view(&self) -> PartialCollectionView {
        let take = self.take;
        let last = if self.total_items == 0 {
            0
        } else {
            (self.total_items - 1) / take * take
        };
        PartialCollectionView {
            id: self.link(self.skip),
            items_per_page: take,
            first: self.link(0),
            previous: (self.skip > 0).then(|| self.link(self.skip.saturating_sub(take))),
            next: self
                .skip
                .checked_add(take)
                .filter(|next| *next < self.total_items)
                .map(|next| self.link(next)),
            last: self.link(last),
        }
    }

    fn link(&self, skip: u64) -> String {
        let mut pairs: Vec<String> = self
            .query
            .as_deref()
            .unwrap_or_default()
            .split('&')
            .filter(|pair| !pair.is_empty() && !is_paging_pair(pair))
            .map(ToString::to_string)
            .collect();
        pairs.push(format!("$skip={skip}"));
        pairs.push(format!("$top={}", self.take));
        format!("{}?{}", self.collection_iri, pairs.join("&"))
    }
}

fn is_paging_pair(pair: &str) -> bool {
    let key = pair.split('=').next().unwrap_or_default();
    ["$skip", "%24skip", "$top", "%24top"]
        .iter()
        .any(|paging| key.eq_ignore_ascii_case(paging))
}

/// Wraps list results into a `hydra:Collection` for clients accepting
/// `application/ld+json`.
///
/// Applies to operations returning a sequence that are registered for the
/// list capability or take a page size argument.
#[derive(Debug, Clone, Copy, Default)]
pub struct CollectionProjector;

impl CollectionProjector {
    fn applies_to(descriptor: &OperationDescriptor) -> bool {
        matches!(descriptor.result().shape(), TypeShape::Sequence(_))
            && (descriptor.capability() == Some(Capability::List)
                || descriptor.argument_with_role(ParameterRole::Take).is_some())
    }

    fn accepts_graph(request: &RequestInfo) -> bool {
        media::accepted(request.headers())
            .iter()
            .any(|range| media::names(range, APPLICATION_LD_JSON))
    }
}

fn role_value(descriptor: &OperationDescriptor, arguments: &Arguments, role: ParameterRole) -> u64 {
    descriptor
        .argument_with_role(role)
        .and_then(|binding| arguments.value(binding.name()))
        .and_then(Value::as_u64)
        .unwrap_or(0)
}

fn total_items(descriptor: &OperationDescriptor, outcome: &Outcome) -> Option<u64> {
    let position = descriptor
        .result()
        .outputs()
        .iter()
        .position(|output| output.parameter().paging_role() == Some(ParameterRole::TotalItems))?;
    outcome.outputs().get(position).and_then(Value::as_u64)
}

impl ResponseTransformer for CollectionProjector {
    fn transform(
        &self,
        descriptor: &OperationDescriptor,
        request: &RequestInfo,
        arguments: &Arguments,
        outcome: Outcome,
    ) -> HydrantResult<Outcome> {
        if !Self::applies_to(descriptor) || !Self::accepts_graph(request) {
            return Ok(outcome);
        }
        let Some(members) = outcome.value().as_array().cloned() else {
            return Ok(outcome);
        };

        let total = total_items(descriptor, &outcome).unwrap_or(members.len() as u64);
        let page = CollectionPage::new(request.url_without_query(), members, total)
            .paged(
                role_value(descriptor, arguments, ParameterRole::Skip),
                role_value(descriptor, arguments, ParameterRole::Take),
            )
            .with_query(request.query());
        debug!(
            collection = %page.collection_iri,
            total_items = page.total_items,
            take = page.take,
            "projecting collection"
        );

        let mut outcome = outcome.with_shape(TypeShape::Graph);
        outcome.set_value(page.project().to_json_ld());
        Ok(outcome)
    }
}
