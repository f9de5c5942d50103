use std::path::PathBuf;

use crate::domain::*;
use crate::kinds::KindId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Secret,
    /// Space flips it; the value is "true" or "false".
    Toggle,
    /// A local file to upload. Empty means no file.
    Path,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub value: String,
}

impl FormField {
    fn new(key: &'static str, label: &'static str, kind: FieldKind, value: impl Into<String>) -> Self {
        Self {
            key,
            label,
            kind,
            value: value.into(),
        }
    }

    fn text(key: &'static str, label: &'static str, value: impl Into<String>) -> Self {
        Self::new(key, label, FieldKind::Text, value)
    }

    fn toggle(key: &'static str, label: &'static str, on: bool) -> Self {
        Self::new(key, label, FieldKind::Toggle, on.to_string())
    }
}

/// What a submitted form is for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormTarget {
    Create(KindId),
    Edit(KindId, String),
    Profile(String),
    Login,
}

/// A parsed form, ready for the client.
#[derive(Debug, Clone, PartialEq)]
pub enum FormDraft {
    Parent(ParentDraft),
    TestService(TestServiceDraft),
    Registration(RegistrationDraft),
    Profile(ProfileDraft),
    Login { email: String, password: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    pub title: String,
    pub target: FormTarget,
    pub fields: Vec<FormField>,
    pub focus: usize,
}

impl FormState {
    fn new(title: impl Into<String>, target: FormTarget, fields: Vec<FormField>) -> Self {
        Self {
            title: title.into(),
            target,
            fields,
            focus: 0,
        }
    }

    pub fn parent(existing: Option<&Parent>) -> Self {
        let fields = vec![FormField::text(
            "name",
            "Name",
            existing.map(|p| p.name.as_str()).unwrap_or_default(),
        )];
        match existing {
            Some(p) => Self::new(
                "Edit Parent",
                FormTarget::Edit(KindId::Parent, p.id.clone()),
                fields,
            ),
            None => Self::new("Add Parent", FormTarget::Create(KindId::Parent), fields),
        }
    }

    pub fn test_service(existing: Option<&TestService>) -> Self {
        let fields = vec![
            FormField::text(
                "title",
                "Title",
                existing.map(|t| t.title.as_str()).unwrap_or_default(),
            ),
            FormField::toggle("status", "Active", existing.map_or(true, |t| t.status)),
        ];
        match existing {
            Some(t) => Self::new(
                "Edit Test / Service",
                FormTarget::Edit(KindId::TestService, t.id.clone()),
                fields,
            ),
            None => Self::new(
                "Add Test / Service",
                FormTarget::Create(KindId::TestService),
                fields,
            ),
        }
    }

    pub fn registration(existing: Option<&Registration>) -> Self {
        let text = |value: Option<&String>| value.cloned().unwrap_or_default();
        let reg = existing;
        let fields = vec![
            FormField::text(
                "labName",
                "Lab Name",
                reg.map(|r| r.lab_name.clone()).unwrap_or_default(),
            ),
            FormField::text(
                "labType",
                "Lab Type",
                text(reg.and_then(|r| r.lab_type.as_ref())),
            ),
            FormField::text(
                "parent",
                "Parent Id",
                reg.and_then(|r| r.parent.as_ref())
                    .map(|p| p.id().to_string())
                    .unwrap_or_default(),
            ),
            FormField::text(
                "ownerName",
                "Owner Name",
                text(reg.and_then(|r| r.owner_name.as_ref())),
            ),
            FormField::text("phone", "Lab Phone", text(reg.and_then(|r| r.phone.as_ref()))),
            FormField::text("email", "Email", text(reg.and_then(|r| r.email.as_ref()))),
            FormField::text(
                "fullAddress",
                "Full Address",
                text(reg.and_then(|r| r.full_address.as_ref())),
            ),
            FormField::text("city", "City", text(reg.and_then(|r| r.city.as_ref()))),
            FormField::text("state", "State", text(reg.and_then(|r| r.state.as_ref()))),
            FormField::text(
                "pincode",
                "Pincode",
                text(reg.and_then(|r| r.pincode.as_ref())),
            ),
            FormField::toggle("status", "Active", reg.map_or(true, |r| r.status)),
            FormField::new("labLogo", "Logo file", FieldKind::Path, ""),
            FormField::new("labBanner", "Banner file", FieldKind::Path, ""),
            FormField::new("pathologyDocs", "Documents file", FieldKind::Path, ""),
        ];
        match existing {
            Some(r) => Self::new(
                "Edit Registration",
                FormTarget::Edit(KindId::Registration, r.id.clone()),
                fields,
            ),
            None => Self::new(
                "Register New Lab",
                FormTarget::Create(KindId::Registration),
                fields,
            ),
        }
    }

    pub fn profile(profile: &AdminProfile) -> Self {
        Self::new(
            "Edit Profile",
            FormTarget::Profile(profile.id.clone()),
            vec![
                FormField::text("name", "Name", profile.name.clone()),
                FormField::text("email", "Email", profile.email.clone()),
                FormField::new("password", "New password", FieldKind::Secret, ""),
                FormField::new("profilePhoto", "Photo file", FieldKind::Path, ""),
            ],
        )
    }

    pub fn login(email: &str) -> Self {
        Self::new(
            "Admin Login",
            FormTarget::Login,
            vec![
                FormField::text("email", "Email", email),
                FormField::new("password", "Password", FieldKind::Secret, ""),
            ],
        )
    }

    pub fn value(&self, key: &str) -> &str {
        self.fields
            .iter()
            .find(|f| f.key == key)
            .map(|f| f.value.as_str())
            .unwrap_or("")
    }

    fn optional(&self, key: &str) -> Option<String> {
        let value = self.value(key).trim();
        (!value.is_empty()).then(|| value.to_string())
    }

    fn flag(&self, key: &str) -> bool {
        self.value(key) == "true"
    }

    fn path(&self, key: &str) -> Option<PathBuf> {
        self.optional(key).map(PathBuf::from)
    }

    pub fn focused(&self) -> Option<&FormField> {
        self.fields.get(self.focus)
    }

    pub fn focus_next(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + 1) % self.fields.len();
        }
    }

    pub fn focus_prev(&mut self) {
        if !self.fields.is_empty() {
            self.focus = self.focus.checked_sub(1).unwrap_or(self.fields.len() - 1);
        }
    }

    /// Types into the focused field. Space flips a toggle.
    pub fn input(&mut self, c: char) {
        let Some(field) = self.fields.get_mut(self.focus) else {
            return;
        };
        match field.kind {
            FieldKind::Toggle => {
                if c == ' ' {
                    let on = field.value == "true";
                    field.value = (!on).to_string();
                }
            }
            _ => field.value.push(c),
        }
    }

    pub fn backspace(&mut self) {
        if let Some(field) = self.fields.get_mut(self.focus) {
            if field.kind != FieldKind::Toggle {
                field.value.pop();
            }
        }
    }

    pub fn draft(&self) -> FormDraft {
        match &self.target {
            FormTarget::Create(KindId::Parent) | FormTarget::Edit(KindId::Parent, _) => {
                FormDraft::Parent(ParentDraft {
                    name: self.value("name").trim().to_string(),
                })
            }
            FormTarget::Create(KindId::TestService) | FormTarget::Edit(KindId::TestService, _) => {
                FormDraft::TestService(TestServiceDraft {
                    title: self.value("title").trim().to_string(),
                    status: self.flag("status"),
                })
            }
            FormTarget::Create(KindId::Registration)
            | FormTarget::Edit(KindId::Registration, _) => {
                let attachments = [
                    AttachmentField::LabLogo,
                    AttachmentField::LabBanner,
                    AttachmentField::PathologyDocs,
                ]
                .into_iter()
                .filter_map(|field| {
                    self.path(field.as_str())
                        .map(|path| Attachment { field, path })
                })
                .collect();
                FormDraft::Registration(RegistrationDraft {
                    parent: self.optional("parent"),
                    lab_name: self.value("labName").to_string(),
                    lab_type: self.optional("labType"),
                    owner_name: self.value("ownerName").to_string(),
                    phone: self.value("phone").to_string(),
                    email: self.optional("email"),
                    full_address: self.optional("fullAddress"),
                    city: self.optional("city"),
                    state: self.optional("state"),
                    pincode: self.optional("pincode"),
                    status: self.flag("status"),
                    attachments,
                })
            }
            FormTarget::Profile(_) => FormDraft::Profile(ProfileDraft {
                name: self.value("name").trim().to_string(),
                email: self.value("email").trim().to_string(),
                password: self.optional("password"),
                photo: self.path("profilePhoto"),
            }),
            FormTarget::Login => FormDraft::Login {
                email: self.value("email").trim().to_string(),
                password: self.value("password").to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_into(form: &mut FormState, text: &str) {
        for c in text.chars() {
            form.input(c);
        }
    }

    #[test]
    fn edit_form_prefills_and_targets_row() {
        let parent = Parent {
            id: "p1".to_string(),
            name: "Lal Group".to_string(),
            status: true,
            registration_count: 2,
            created_at: None,
        };
        let mut form = FormState::parent(Some(&parent));
        assert_eq!(form.target, FormTarget::Edit(KindId::Parent, "p1".to_string()));
        form.backspace();
        type_into(&mut form, "p ");

        assert_eq!(
            form.draft(),
            FormDraft::Parent(ParentDraft {
                name: "Lal Group".to_string()
            })
        );
    }

    #[test]
    fn space_flips_toggle_fields() {
        let mut form = FormState::test_service(None);
        type_into(&mut form, "CBC");
        form.focus_next();
        assert_eq!(form.focused().map(|f| f.kind), Some(FieldKind::Toggle));
        form.input('x');
        form.input(' ');

        assert_eq!(
            form.draft(),
            FormDraft::TestService(TestServiceDraft {
                title: "CBC".to_string(),
                status: false,
            })
        );
    }

    #[test]
    fn registration_draft_skips_blank_optionals() {
        let mut form = FormState::registration(None);
        type_into(&mut form, "Metro Labs");
        while form.focused().map(|f| f.key) != Some("labBanner") {
            form.focus_next();
        }
        type_into(&mut form, "/tmp/banner.png");
        while form.focused().map(|f| f.key) != Some("city") {
            form.focus_prev();
        }
        type_into(&mut form, "   ");

        let FormDraft::Registration(draft) = form.draft() else {
            panic!("expected a registration draft");
        };
        assert_eq!(draft.lab_name, "Metro Labs");
        assert_eq!(draft.city, None);
        assert_eq!(draft.parent, None);
        assert!(draft.status);
        assert_eq!(
            draft.attachments,
            vec![Attachment {
                field: AttachmentField::LabBanner,
                path: PathBuf::from("/tmp/banner.png"),
            }]
        );
        assert!(draft.validate().is_err());
    }

    #[test]
    fn focus_wraps_both_ways() {
        let mut form = FormState::login("admin@example.com");
        form.focus_prev();
        assert_eq!(form.focus, 1);
        form.focus_next();
        assert_eq!(form.focus, 0);
    }
}
