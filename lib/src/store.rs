//! In-memory triple store backing every resource, and the filter that builds one
//! from a parser's triple stream.

use crate::errors::{Error, Result};
use oxigraph::model::{Graph, NamedNode, NamedNodeRef, NamedOrBlankNodeRef, TermRef, Triple, TripleRef};
use std::collections::HashSet;

/// A queryable set of triples. Lookups return matches in no particular order.
#[derive(Debug, Clone, Default)]
pub struct TripleStore {
    graph: Graph,
}

impl TripleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.graph.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.is_empty()
    }

    pub fn contains<'a>(&self, triple: impl Into<TripleRef<'a>>) -> bool {
        self.graph.contains(triple)
    }

    pub fn iter(&self) -> impl Iterator<Item = TripleRef<'_>> {
        self.graph.iter()
    }

    /// Returns every triple matching the pattern; `None` is a wildcard.
    pub fn find<'a>(
        &'a self,
        subject: Option<NamedOrBlankNodeRef<'a>>,
        predicate: Option<NamedNodeRef<'a>>,
        object: Option<TermRef<'a>>,
    ) -> Box<dyn Iterator<Item = TripleRef<'a>> + 'a> {
        // start from the most selective index, then check the remaining positions
        let candidates: Box<dyn Iterator<Item = TripleRef<'a>> + 'a> =
            match (subject, predicate, object) {
                (Some(s), _, _) => Box::new(self.graph.triples_for_subject(s)),
                (None, Some(p), _) => Box::new(self.graph.triples_for_predicate(p)),
                (None, None, Some(o)) => Box::new(self.graph.triples_for_object(o)),
                (None, None, None) => Box::new(self.graph.iter()),
            };
        Box::new(candidates.filter(move |t| {
            subject.map_or(true, |s| t.subject == s)
                && predicate.map_or(true, |p| t.predicate == p)
                && object.map_or(true, |o| t.object == o)
        }))
    }

    /// All objects of `(subject, predicate, *)`.
    pub fn objects<'a>(
        &'a self,
        subject: NamedOrBlankNodeRef<'a>,
        predicate: NamedNodeRef<'a>,
    ) -> impl Iterator<Item = TermRef<'a>> + 'a {
        self.find(Some(subject), Some(predicate), None)
            .map(|t| t.object)
    }

    /// Some object of `(subject, predicate, *)`, if there is one.
    pub fn object<'a>(
        &'a self,
        subject: NamedOrBlankNodeRef<'a>,
        predicate: NamedNodeRef<'a>,
    ) -> Option<TermRef<'a>> {
        self.objects(subject, predicate).next()
    }

    fn insert(&mut self, triple: &Triple) {
        self.graph.insert(triple);
    }
}

impl From<Graph> for TripleStore {
    fn from(graph: Graph) -> Self {
        Self { graph }
    }
}

impl FromIterator<Triple> for TripleStore {
    fn from_iter<I: IntoIterator<Item = Triple>>(iter: I) -> Self {
        let mut store = TripleStore::new();
        for triple in iter {
            store.insert(&triple);
        }
        store
    }
}

/// Which predicates survive [`filter_triples`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PredicateFilter {
    Any,
    Only(HashSet<NamedNode>),
}

impl PredicateFilter {
    pub fn only<'a>(predicates: impl IntoIterator<Item = NamedNodeRef<'a>>) -> Self {
        PredicateFilter::Only(predicates.into_iter().map(NamedNodeRef::into_owned).collect())
    }

    pub fn accepts(&self, predicate: NamedNodeRef<'_>) -> bool {
        match self {
            PredicateFilter::Any => true,
            PredicateFilter::Only(predicates) => predicates.contains(&predicate.into_owned()),
        }
    }
}

/// Drains a single-pass triple sequence into a new store, keeping the triples whose
/// predicate passes `filter`. The sequence is consumed exactly once; the first
/// error aborts the build and the partial store is dropped with it.
pub fn filter_triples<I, E>(triples: I, filter: &PredicateFilter) -> Result<TripleStore>
where
    I: IntoIterator<Item = std::result::Result<Triple, E>>,
    E: Into<Error>,
{
    let mut store = TripleStore::new();
    for triple in triples {
        let triple = triple.map_err(Into::into)?;
        if filter.accepts(triple.predicate.as_ref()) {
            store.insert(&triple);
        }
    }
    Ok(store)
}
