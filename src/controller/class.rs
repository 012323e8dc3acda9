use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use futures_util::future::BoxFuture;
use serde_json::Value;

use crate::dispatch::{ActionError, ActionReturn, RequestContext};

/// 생성자에 해당하는 예약 이름. 액션으로 쓸 수 없습니다.
pub const RESERVED_CONSTRUCTOR: &str = "constructor";

/// 컨트롤러 트레이트
///
/// 요청마다 `new`로 인스턴스를 하나 만들고, `members`가 돌려준 액션 중 하나를
/// 호출합니다.
pub trait Controller: Send + Sync + Sized + 'static {
    /// 컨트롤러 이름 (접미사 규칙 검사와 라우팅 키에 사용)
    const NAME: &'static str;

    fn new(ctx: &RequestContext) -> Self;

    /// 인스턴스 멤버 목록 (선언 순서)
    fn members() -> Vec<Member<Self>>;
}

/// 컨트롤러 식별자
///
/// 타입 정보로 구분하며 이름은 진단용입니다.
#[derive(Clone, Copy)]
pub struct ControllerKey {
    type_id: TypeId,
    name: &'static str,
}

impl ControllerKey {
    pub fn of<C: Controller>() -> Self {
        Self {
            type_id: TypeId::of::<C>(),
            name: C::NAME,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for ControllerKey {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for ControllerKey {}

impl Hash for ControllerKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl fmt::Debug for ControllerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ControllerKey({})", self.name)
    }
}

#[doc(hidden)]
pub trait ErasedAction<C>: Send + Sync {
    fn call(&self, controller: Arc<C>, data: Value) -> BoxFuture<'static, Result<ActionReturn, ActionError>>;
}

/// 컨트롤러 인스턴스에 묶어 호출할 수 있는 액션
pub type ActionHandle<C> = Arc<dyn ErasedAction<C>>;

struct FnAction<F>(F);

impl<C, F, Fut, R> ErasedAction<C> for FnAction<F>
where
    C: Send + Sync + 'static,
    F: Fn(Arc<C>, Value) -> Fut + Send + Sync,
    Fut: Future<Output = Result<R, ActionError>> + Send + 'static,
    R: Into<ActionReturn>,
{
    fn call(&self, controller: Arc<C>, data: Value) -> BoxFuture<'static, Result<ActionReturn, ActionError>> {
        let fut = (self.0)(controller, data);
        Box::pin(async move { fut.await.map(Into::into) })
    }
}

pub enum MemberKind<C> {
    /// 호출 가능한 액션
    Action(ActionHandle<C>),
    /// 호출할 수 없는 멤버
    Property,
}

impl<C> Clone for MemberKind<C> {
    fn clone(&self) -> Self {
        match self {
            MemberKind::Action(handle) => MemberKind::Action(handle.clone()),
            MemberKind::Property => MemberKind::Property,
        }
    }
}

/// 컨트롤러 인스턴스 멤버
pub struct Member<C> {
    pub name: String,
    pub kind: MemberKind<C>,
}

impl<C: Send + Sync + 'static> Member<C> {
    pub fn action<F, Fut, R>(name: impl Into<String>, action: F) -> Self
    where
        F: Fn(Arc<C>, Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<R, ActionError>> + Send + 'static,
        R: Into<ActionReturn> + 'static,
    {
        Self {
            name: name.into(),
            kind: MemberKind::Action(Arc::new(FnAction(action))),
        }
    }

    pub fn property(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: MemberKind::Property,
        }
    }

    pub fn is_callable(&self) -> bool {
        matches!(self.kind, MemberKind::Action(_))
    }
}

impl<C> Clone for Member<C> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            kind: self.kind.clone(),
        }
    }
}

impl<C> fmt::Debug for Member<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            MemberKind::Action(_) => "action",
            MemberKind::Property => "property",
        };
        f.debug_struct("Member")
            .field("name", &self.name)
            .field("kind", &kind)
            .finish()
    }
}

/// 등록 시점에 한 번 만들어 두는 컨트롤러 액션 조회 테이블
pub struct ControllerClass<C> {
    key: ControllerKey,
    members: Vec<Member<C>>,
    // 소문자 이름 -> 같은 이름을 가진 첫 번째 멤버 인덱스
    lookup: HashMap<String, usize>,
}

impl<C: Controller> ControllerClass<C> {
    pub fn new() -> Self {
        let members = C::members();
        let mut lookup = HashMap::with_capacity(members.len());
        for (index, member) in members.iter().enumerate() {
            lookup.entry(member.name.to_lowercase()).or_insert(index);
        }

        Self {
            key: ControllerKey::of::<C>(),
            members,
            lookup,
        }
    }

    pub fn key(&self) -> ControllerKey {
        self.key
    }

    pub fn name(&self) -> &'static str {
        self.key.name
    }

    pub fn members(&self) -> &[Member<C>] {
        &self.members
    }

    /// 대소문자를 무시하고 멤버를 찾습니다.
    pub fn find(&self, name: &str) -> Option<&Member<C>> {
        self.lookup
            .get(&name.to_lowercase())
            .map(|&index| &self.members[index])
    }

    /// 호출 가능한 액션 이름 목록 (예약 이름 제외)
    pub fn action_names(&self) -> impl Iterator<Item = &str> {
        self.members
            .iter()
            .filter(|member| member.is_callable())
            .map(|member| member.name.as_str())
            .filter(|name| !name.eq_ignore_ascii_case(RESERVED_CONSTRUCTOR))
    }

    /// 대소문자를 무시했을 때 겹치는 첫 번째 멤버 이름
    pub(crate) fn first_duplicate(&self) -> Option<&str> {
        let mut seen = std::collections::HashSet::new();
        self.members
            .iter()
            .map(|member| member.name.as_str())
            .filter(|name| *name != RESERVED_CONSTRUCTOR)
            .find(|name| !seen.insert(name.to_lowercase()))
    }
}

impl<C: Controller> Default for ControllerClass<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for ControllerClass<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControllerClass")
            .field("key", &self.key)
            .field("members", &self.members)
            .finish()
    }
}
