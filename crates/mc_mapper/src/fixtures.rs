//! Hand-written stand-ins for generated converters, shared by tests.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::convert::{ClassInfo, Context, FieldInfo, TypeFactory, TypedConverter};
use crate::hooks::HookChain;
use crate::info::{GenericTypeInfoCell, NonGenericTypeInfoCell, TypeInfo, TypeKind};
use crate::poly::{Discriminator, Family};
use crate::registry::{GetTypeMeta, TypeMeta, TypeRegistry};
use crate::{MapResult, MapType, Mappable, Mapper, Mapping, Value};

macro_rules! class_type_info {
    ($ty:ty, $name:literal) => {
        impl MapType for $ty {
            fn type_info() -> &'static TypeInfo {
                static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
                CELL.get_or_init(|| TypeInfo::new::<$ty>($name, TypeKind::Class))
            }
        }
    };
}

// -----------------------------------------------------------------------------
// Person

#[derive(Clone, Debug, PartialEq)]
pub struct Person {
    pub name: String,
    pub age: i64,
    pub email: Option<String>,
}

impl Person {
    pub fn judy() -> Self {
        Self {
            name: "Judy".into(),
            age: 7,
            email: None,
        }
    }
}

class_type_info!(Person, "Person");

pub struct PersonConverter {
    class: ClassInfo,
}

impl PersonConverter {
    pub fn new(hooks: HookChain) -> Self {
        Self {
            class: ClassInfo::new().with_hooks(hooks).with_fields([
                FieldInfo::new("name"),
                FieldInfo::new("age"),
                FieldInfo::new("email"),
            ]),
        }
    }
}

impl TypedConverter<Person> for PersonConverter {
    fn decode(&self, value: &Value, cx: &Context<'_>) -> MapResult<Person> {
        let map = cx.expect_map(value)?;
        Ok(Person {
            name: cx.field(map, "name")?,
            age: cx.field(map, "age")?,
            email: cx.field(map, "email")?,
        })
    }

    fn encode(&self, value: &Person, cx: &Context<'_>) -> MapResult<Value> {
        let mut map = Mapping::with_capacity(3);
        cx.put(&mut map, "name", &value.name)?;
        cx.put(&mut map, "age", &value.age)?;
        cx.put(&mut map, "email", &value.email)?;
        Ok(Value::Map(map))
    }

    fn equals(&self, a: &Person, b: &Person, cx: &Context<'_>) -> bool {
        cx.equals(&a.name, &b.name) && cx.equals(&a.age, &b.age) && cx.equals(&a.email, &b.email)
    }

    fn hash(&self, value: &Person, cx: &Context<'_>) -> u64 {
        cx.hash_fields(
            "Person",
            [cx.hash(&value.name), cx.hash(&value.age), cx.hash(&value.email)],
        )
    }

    fn stringify(&self, value: &Person, cx: &Context<'_>) -> String {
        cx.class_to_string("Person")
            .field("name", &value.name)
            .field("age", &value.age)
            .field("email", &value.email)
            .finish()
    }

    fn class_info(&self) -> Option<&ClassInfo> {
        Some(&self.class)
    }
}

impl GetTypeMeta for Person {
    fn get_type_meta() -> TypeMeta {
        TypeMeta::new::<Person>(PersonConverter::new(HookChain::new()))
            .with_factory(TypeFactory::of::<Person>())
    }

    fn register_dependencies(registry: &mut TypeRegistry) {
        registry.register_fallback::<Option<String>>();
    }
}

crate::impl_auto_register!(Person);

// -----------------------------------------------------------------------------
// Wrapper

/// A generic class, usually registered in its open form `Wrapper<Dynamic>`.
#[derive(Clone, Debug)]
pub struct Wrapper<T> {
    pub inner: T,
}

impl<T: MapType> MapType for Wrapper<T> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| {
            TypeInfo::generic::<Self>("Wrapper", TypeKind::Class, &[T::type_info()])
        })
    }
}

pub struct WrapperConverter;

impl<T: MapType> TypedConverter<Wrapper<T>> for WrapperConverter {
    fn decode(&self, value: &Value, cx: &Context<'_>) -> MapResult<Wrapper<T>> {
        let map = cx.expect_map(value)?;
        Ok(Wrapper {
            inner: cx.field(map, "inner")?,
        })
    }

    fn encode(&self, value: &Wrapper<T>, cx: &Context<'_>) -> MapResult<Value> {
        let mut map = Mapping::new();
        cx.put(&mut map, "inner", &value.inner)?;
        Ok(Value::Map(map))
    }
}

impl<T: MapType> GetTypeMeta for Wrapper<T> {
    fn get_type_meta() -> TypeMeta {
        TypeMeta::new::<Self>(WrapperConverter)
    }
}

// -----------------------------------------------------------------------------
// Animal family

pub trait Animal: Mappable + fmt::Debug {
    fn name(&self) -> &str;

    fn clone_animal(&self) -> Box<dyn Animal>;
}

impl Clone for Box<dyn Animal> {
    fn clone(&self) -> Self {
        (**self).clone_animal()
    }
}

impl MapType for Box<dyn Animal> {
    fn type_info() -> &'static TypeInfo {
        static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
        CELL.get_or_init(|| TypeInfo::new::<Box<dyn Animal>>("Animal", TypeKind::Family))
    }
}

/// Discriminator `"Cat"`.
#[derive(Clone, Debug, PartialEq)]
pub struct Cat {
    pub name: String,
    pub color: String,
}

/// The default subtype.
#[derive(Clone, Debug, PartialEq)]
pub struct Dog {
    pub name: String,
    pub good: bool,
}

/// Discriminator null.
#[derive(Clone, Debug, PartialEq)]
pub struct Bird {
    pub name: String,
}

class_type_info!(Cat, "Cat");
class_type_info!(Dog, "Dog");
class_type_info!(Bird, "Bird");

macro_rules! impl_animal {
    ($ty:ty) => {
        impl Animal for $ty {
            fn name(&self) -> &str {
                &self.name
            }

            fn clone_animal(&self) -> Box<dyn Animal> {
                Box::new(self.clone())
            }
        }
    };
}

impl_animal!(Cat);
impl_animal!(Dog);
impl_animal!(Bird);

fn animal_class(hooks: HookChain) -> ClassInfo {
    ClassInfo::new()
        .with_parent::<Box<dyn Animal>>()
        .with_hooks(hooks)
}

pub struct CatConverter {
    class: ClassInfo,
}

impl TypedConverter<Cat> for CatConverter {
    fn decode(&self, value: &Value, cx: &Context<'_>) -> MapResult<Cat> {
        let map = cx.expect_map(value)?;
        Ok(Cat {
            name: cx.field(map, "name")?,
            color: cx.field(map, "color")?,
        })
    }

    fn encode(&self, value: &Cat, cx: &Context<'_>) -> MapResult<Value> {
        let mut map = Mapping::new();
        cx.put(&mut map, "name", &value.name)?;
        cx.put(&mut map, "color", &value.color)?;
        Ok(Value::Map(map))
    }

    fn class_info(&self) -> Option<&ClassInfo> {
        Some(&self.class)
    }
}

pub struct DogConverter {
    class: ClassInfo,
}

impl TypedConverter<Dog> for DogConverter {
    fn decode(&self, value: &Value, cx: &Context<'_>) -> MapResult<Dog> {
        let map = cx.expect_map(value)?;
        Ok(Dog {
            name: cx.field(map, "name")?,
            good: cx.field_or(map, "good", || true)?,
        })
    }

    fn encode(&self, value: &Dog, cx: &Context<'_>) -> MapResult<Value> {
        let mut map = Mapping::new();
        cx.put(&mut map, "name", &value.name)?;
        cx.put(&mut map, "good", &value.good)?;
        Ok(Value::Map(map))
    }

    fn class_info(&self) -> Option<&ClassInfo> {
        Some(&self.class)
    }
}

pub struct BirdConverter {
    class: ClassInfo,
}

impl TypedConverter<Bird> for BirdConverter {
    fn decode(&self, value: &Value, cx: &Context<'_>) -> MapResult<Bird> {
        let map = cx.expect_map(value)?;
        Ok(Bird {
            name: cx.field(map, "name")?,
        })
    }

    fn encode(&self, value: &Bird, cx: &Context<'_>) -> MapResult<Value> {
        let mut map = Mapping::new();
        cx.put(&mut map, "name", &value.name)?;
        Ok(Value::Map(map))
    }

    fn class_info(&self) -> Option<&ClassInfo> {
        Some(&self.class)
    }
}

pub fn animal_family(hooks: HookChain) -> Family<Box<dyn Animal>> {
    Family::<Box<dyn Animal>>::new(|animal| &**animal)
        .with_hooks(hooks)
        .subtype::<Cat>(Discriminator::value("Cat"), |cat| Box::new(cat))
        .subtype::<Dog>(Discriminator::Default, |dog| Box::new(dog))
        .subtype::<Bird>(Discriminator::Null, |bird| Box::new(bird))
}

/// Registers the animals, with class hooks on the family and on `Cat`.
pub fn register_animals_with(mapper: &Mapper, family: HookChain, cat: HookChain) {
    mapper.use_converter::<Cat>(CatConverter {
        class: animal_class(cat),
    });
    mapper.use_converter::<Dog>(DogConverter {
        class: animal_class(HookChain::new()),
    });
    mapper.use_converter::<Bird>(BirdConverter {
        class: animal_class(HookChain::new()),
    });
    mapper
        .use_family(animal_family(family))
        .expect("animal family is unambiguous");
}

pub fn register_animals(mapper: &Mapper) {
    register_animals_with(mapper, HookChain::new(), HookChain::new());
}

// -----------------------------------------------------------------------------
// Owner

/// A class with a family-typed list and an open field.
#[derive(Clone, Debug)]
pub struct Owner {
    pub name: String,
    pub pets: Vec<Box<dyn Animal>>,
    pub note: crate::Dynamic,
}

class_type_info!(Owner, "Owner");

pub struct OwnerConverter;

impl TypedConverter<Owner> for OwnerConverter {
    fn decode(&self, value: &Value, cx: &Context<'_>) -> MapResult<Owner> {
        let map = cx.expect_map(value)?;
        Ok(Owner {
            name: cx.field(map, "name")?,
            pets: cx.field(map, "pets")?,
            note: cx.field(map, "note")?,
        })
    }

    fn encode(&self, value: &Owner, cx: &Context<'_>) -> MapResult<Value> {
        let mut map = Mapping::new();
        cx.put(&mut map, "name", &value.name)?;
        cx.put(&mut map, "pets", &value.pets)?;
        cx.put(&mut map, "note", &value.note)?;
        Ok(Value::Map(map))
    }

    fn equals(&self, a: &Owner, b: &Owner, cx: &Context<'_>) -> bool {
        cx.equals(&a.name, &b.name) && cx.equals(&a.pets, &b.pets) && cx.equals(&a.note, &b.note)
    }
}
