//! Read and write controller capabilities.
//!
//! Implementing [`ReadController`] (and optionally [`WriteController`]) and
//! registering the type with [`ControllerDefinition::read_controller`] or
//! [`ControllerDefinition::write_controller`] adds the conventional list,
//! get, create, update and delete members:
//!
//! | Member | Verb | Route | Result |
//! |--------|------|-------|--------|
//! | list | GET | `{base}{?$skip,$top,$filter}` | entities, `Content-Range` |
//! | get | GET | `{base}/{id}` | entity or `404` |
//! | create | POST | `{base}` | `201` with `Location` |
//! | update | PUT | `{base}/{id}` | `204` |
//! | delete | DELETE | `{base}/{id}` | `204` |

use std::sync::Arc;

use async_trait::async_trait;
use hydrant_core::{
    Capability, FilterExpression, HydrantError, HydrantResult, ListQuery, MethodInfo, Page,
    ParameterInfo, ParameterRole, Shaped, TypeShape, FILTER_VARIABLE, SKIP_VARIABLE, TOP_VARIABLE,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::controller::ControllerDefinition;
use crate::outcome::Outcome;

/// Name of the key argument of get, update and delete.
pub const KEY_ARGUMENT: &str = "id";

/// A controller exposing a readable collection of entities.
#[async_trait]
pub trait ReadController: Send + Sync + 'static {
    /// The entity type.
    type Entity: Serialize + DeserializeOwned + Send + Sync + 'static;
    /// The entity key type.
    type Key: Shaped + Serialize + DeserializeOwned + Send + Sync + 'static;

    /// Class name of the entity, used in descriptions.
    const ENTITY: &'static str;

    /// Returns one page of entities.
    async fn list(&self, query: ListQuery) -> HydrantResult<Page<Self::Entity>>;

    /// Returns one entity, `None` when it does not exist.
    async fn get(&self, key: Self::Key) -> HydrantResult<Option<Self::Entity>>;
}

/// A controller that can also change its collection.
#[async_trait]
pub trait WriteController: ReadController {
    /// Adds an entity and returns its key.
    async fn create(&self, entity: Self::Entity) -> HydrantResult<Self::Key>;

    /// Replaces an entity.
    async fn update(&self, key: Self::Key, entity: Self::Entity) -> HydrantResult<()>;

    /// Removes an entity.
    async fn delete(&self, key: Self::Key) -> HydrantResult<()>;
}

fn entity_shape<C: ReadController>() -> TypeShape {
    TypeShape::object(C::ENTITY)
}

fn key_parameter<C: ReadController>() -> ParameterInfo {
    ParameterInfo::new::<C::Key>(KEY_ARGUMENT).from_url()
}

fn entity_parameter<C: ReadController>() -> ParameterInfo {
    ParameterInfo::with_shape("entity", entity_shape::<C>()).from_body()
}

/// Metadata of the conventional list member.
#[must_use]
pub fn list_method(entity: TypeShape) -> MethodInfo {
    MethodInfo::new("list")
        .capability(Capability::List)
        .param(ParameterInfo::out::<usize>("total_items").role(ParameterRole::TotalItems))
        .param(
            ParameterInfo::new::<usize>("skip")
                .from_query()
                .variable(SKIP_VARIABLE)
                .default_value(0)
                .role(ParameterRole::Skip),
        )
        .param(
            ParameterInfo::new::<usize>("take")
                .from_query()
                .variable(TOP_VARIABLE)
                .default_value(0)
                .role(ParameterRole::Take),
        )
        .param(
            ParameterInfo::new::<Option<FilterExpression>>("filter")
                .from_query()
                .variable(FILTER_VARIABLE)
                .role(ParameterRole::Filter),
        )
        .returns_shape(TypeShape::sequence(entity))
}

impl ControllerDefinition {
    /// Registers the list and get members of a [`ReadController`].
    #[must_use]
    pub fn read_controller<C: ReadController>(mut self, controller: Arc<C>) -> Self {
        self = self
            .entity(entity_shape::<C>())
            .capability(Capability::List)
            .capability(Capability::Get);

        let list = Arc::clone(&controller);
        self.push_method(list_method(entity_shape::<C>()), move |invocation| {
            let controller = Arc::clone(&list);
            async move {
                let skip: usize = invocation.get("skip")?;
                let take: usize = invocation.get("take")?;
                let filter: Option<FilterExpression> = invocation.get("filter")?;
                let mut query = ListQuery::new(skip, take);
                if let Some(filter) = filter {
                    query = query.with_filter(filter);
                }
                let page = controller.list(query).await?;
                Ok(Outcome::of(&page.items)?.with_output(Value::from(page.total_items)))
            }
        });

        let get = controller;
        self.push_method(
            MethodInfo::new("get")
                .capability(Capability::Get)
                .param(key_parameter::<C>())
                .returns_shape(entity_shape::<C>()),
            move |invocation| {
                let controller = Arc::clone(&get);
                async move {
                    let key: C::Key = invocation.get(KEY_ARGUMENT)?;
                    let raw = invocation.arguments().value(KEY_ARGUMENT).cloned();
                    match controller.get(key).await? {
                        Some(entity) => Outcome::of(&entity),
                        None => Err(HydrantError::not_found_resource(
                            C::ENTITY,
                            raw.map(|v| hydrant_convert::format_scalar(&v))
                                .unwrap_or_default(),
                        )),
                    }
                }
            },
        );

        self
    }

    /// Registers every member of a [`WriteController`].
    #[must_use]
    pub fn write_controller<C: WriteController>(mut self, controller: Arc<C>) -> Self {
        self = self
            .read_controller(Arc::clone(&controller))
            .capability(Capability::Create)
            .capability(Capability::Update)
            .capability(Capability::Delete);

        let create = Arc::clone(&controller);
        self.push_method(
            MethodInfo::new("create")
                .capability(Capability::Create)
                .param(entity_parameter::<C>())
                .returns_shape(C::Key::shape()),
            move |invocation| {
                let controller = Arc::clone(&create);
                async move {
                    let entity: C::Entity = invocation.get("entity")?;
                    let key = controller.create(entity).await?;
                    Outcome::of(&key)
                }
            },
        );

        let update = Arc::clone(&controller);
        self.push_method(
            MethodInfo::new("update")
                .capability(Capability::Update)
                .param(key_parameter::<C>())
                .param(entity_parameter::<C>())
                .returns::<()>(),
            move |invocation| {
                let controller = Arc::clone(&update);
                async move {
                    let key: C::Key = invocation.get(KEY_ARGUMENT)?;
                    let entity: C::Entity = invocation.get("entity")?;
                    controller.update(key, entity).await?;
                    Ok(Outcome::empty())
                }
            },
        );

        let delete = controller;
        self.push_method(
            MethodInfo::new("delete")
                .capability(Capability::Delete)
                .param(key_parameter::<C>())
                .returns::<()>(),
            move |invocation| {
                let controller = Arc::clone(&delete);
                async move {
                    let key: C::Key = invocation.get(KEY_ARGUMENT)?;
                    controller.delete(key).await?;
                    Ok(Outcome::empty())
                }
            },
        );

        self
    }
}
