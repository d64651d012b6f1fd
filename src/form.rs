use crate::state::NewPlayer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Breed,
    Name,
    Description,
    ImageUrl,
}

impl FormField {
    pub const ALL: [FormField; 4] = [
        FormField::Breed,
        FormField::Name,
        FormField::Description,
        FormField::ImageUrl,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FormField::Breed => "Breed",
            FormField::Name => "Name",
            FormField::Description => "Description",
            FormField::ImageUrl => "Profile Picture",
        }
    }

    /// Name the field goes by in the create payload.
    pub fn input_name(self) -> &'static str {
        match self {
            FormField::Breed => "breed",
            FormField::Name => "name",
            FormField::Description => "description",
            FormField::ImageUrl => "imageUrl",
        }
    }

    pub fn from_input_name(name: &str) -> Option<FormField> {
        Self::ALL.into_iter().find(|f| f.input_name() == name)
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> FormField {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> FormField {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Clone)]
pub struct NewPlayerForm {
    /// True while key presses are routed into the form.
    pub active: bool,
    pub focus: FormField,
    draft: NewPlayer,
}

impl Default for NewPlayerForm {
    fn default() -> Self {
        Self::new()
    }
}

impl NewPlayerForm {
    pub fn new() -> Self {
        Self {
            active: false,
            focus: FormField::Breed,
            draft: NewPlayer::default(),
        }
    }

    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::Breed => &self.draft.breed,
            FormField::Name => &self.draft.name,
            FormField::Description => &self.draft.description,
            FormField::ImageUrl => &self.draft.image_url,
        }
    }

    fn value_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::Breed => &mut self.draft.breed,
            FormField::Name => &mut self.draft.name,
            FormField::Description => &mut self.draft.description,
            FormField::ImageUrl => &mut self.draft.image_url,
        }
    }

    pub fn set_value(&mut self, field: FormField, value: impl Into<String>) {
        *self.value_mut(field) = value.into();
    }

    pub fn push_char(&mut self, c: char) {
        let focus = self.focus;
        self.value_mut(focus).push(c);
    }

    pub fn backspace(&mut self) {
        let focus = self.focus;
        self.value_mut(focus).pop();
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
    }

    pub fn clear(&mut self) {
        self.draft = NewPlayer::default();
        self.focus = FormField::Breed;
    }

    /// Empties and closes the form.
    pub fn reset(&mut self) {
        self.clear();
        self.active = false;
    }

    /// Builds the trimmed payload. The draft stays as typed until the server
    /// accepts it; a blank field is returned as the error and gets the focus.
    pub fn submit(&mut self) -> Result<NewPlayer, FormField> {
        let candidate = NewPlayer {
            name: self.draft.name.trim().to_string(),
            breed: self.draft.breed.trim().to_string(),
            description: self.draft.description.trim().to_string(),
            image_url: self.draft.image_url.trim().to_string(),
        };
        if let Some(missing) = candidate
            .missing_field()
            .and_then(FormField::from_input_name)
        {
            self.focus = missing;
            return Err(missing);
        }
        Ok(candidate)
    }
}
